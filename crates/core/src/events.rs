//! Notifications a control queues for its host.

use crate::option::{OptionKey, OptionValue};

/// Events raised for consumers of the control.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
	/// The dropdown opened. Never raised in listbox mode.
	Open,
	/// The dropdown closed. Never raised in listbox mode.
	Close,
	/// The selection was cleared by the user.
	Clear,
	/// An option was committed.
	Selected { key: OptionKey, value: OptionValue },
	/// The selection changed; carries the full new selection.
	SelectionChanged {
		keys: Vec<OptionKey>,
		values: Vec<OptionValue>,
	},
}

impl SelectEvent {
	/// Event name as seen by consumers.
	#[must_use]
	pub fn name(&self) -> &'static str {
		match self {
			Self::Open => "open",
			Self::Close => "close",
			Self::Clear => "clear",
			Self::Selected { .. } => "selected",
			Self::SelectionChanged { .. } => "selection-changed",
		}
	}
}

/// Requests to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
	/// Scroll the option into view with "nearest" alignment; a no-op when it
	/// is already visible.
	ScrollIntoView { key: OptionKey },
	/// Move keyboard focus to the search input.
	FocusSearch,
}
