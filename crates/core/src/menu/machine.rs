use serde::{Deserialize, Serialize};

use crate::option::OptionKey;
use crate::search::FilteredIndex;

/// Transient animation state layered over open/closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
	#[default]
	None,
	Opening,
	Closing,
}

impl MenuState {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Opening => "opening",
			Self::Closing => "closing",
		}
	}
}

/// Direction of keyboard navigation through the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Up,
	Down,
}

/// Open/closed state, highlighted option and search string of one control.
#[derive(Debug, Clone, Default)]
pub struct MenuStateMachine {
	open: bool,
	state: MenuState,
	active: Option<OptionKey>,
	search: String,
	clear_search_on_blur: bool,
	animated: bool,
}

impl MenuStateMachine {
	/// A closed menu with no active option and an empty search.
	///
	/// When `animated` is set, opening and closing enter the `Opening` and
	/// `Closing` states until [`transition_finished`](Self::transition_finished)
	/// is called.
	#[must_use]
	pub fn new(clear_search_on_blur: bool, animated: bool) -> Self {
		Self {
			clear_search_on_blur,
			animated,
			..Self::default()
		}
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.open
	}

	#[must_use]
	pub fn state(&self) -> MenuState {
		self.state
	}

	#[must_use]
	pub fn active(&self) -> Option<&OptionKey> {
		self.active.as_ref()
	}

	#[must_use]
	pub fn search(&self) -> &str {
		&self.search
	}

	pub fn set_clear_search_on_blur(&mut self, clear: bool) {
		self.clear_search_on_blur = clear;
	}

	pub fn set_animated(&mut self, animated: bool) {
		self.animated = animated;
		if !animated {
			self.state = MenuState::None;
		}
	}

	/// Open the menu unless it is already open or mid-transition.
	///
	/// Returns `true` when the menu transitioned to open.
	pub fn request_open(&mut self) -> bool {
		if self.open || self.state != MenuState::None {
			return false;
		}
		self.open = true;
		if self.animated {
			self.state = MenuState::Opening;
		}
		true
	}

	/// Close the menu and forget the active option.
	///
	/// Returns `true` when the menu was open.
	pub fn close(&mut self) -> bool {
		let was_open = self.open;
		self.open = false;
		self.active = None;
		if self.clear_search_on_blur {
			self.search.clear();
		}
		if was_open && self.animated {
			self.state = MenuState::Closing;
		}
		was_open
	}

	/// Record that a transition animation started.
	pub fn transition_started(&mut self, state: MenuState) {
		if self.animated {
			self.state = state;
		}
	}

	/// Record that the running transition animation finished.
	pub fn transition_finished(&mut self) {
		self.state = MenuState::None;
	}

	/// Move the active option through `filtered`, wrapping at either end.
	///
	/// With no active option, `Down` picks the first entry and `Up` the last.
	/// Returns the new active key, or `None` when the view is empty.
	pub fn navigate(&mut self, direction: Direction, filtered: &FilteredIndex) -> Option<OptionKey> {
		let len = filtered.len();
		if len == 0 {
			self.active = None;
			return None;
		}

		let current = self
			.active
			.as_ref()
			.and_then(|key| filtered.position_of(key));
		let next = match (current, direction) {
			(None, Direction::Down) => 0,
			(None, Direction::Up) => len - 1,
			(Some(position), Direction::Down) => (position + 1) % len,
			(Some(position), Direction::Up) => (position + len - 1) % len,
		};

		let key = filtered.get_index(next).map(|(key, _)| key.clone());
		tracing::trace!(?direction, position = next, "navigated options");
		self.active.clone_from(&key);
		key
	}

	/// Highlight `key` if the view contains it. Returns whether it did.
	pub fn set_active(&mut self, key: &OptionKey, filtered: &FilteredIndex) -> bool {
		if filtered.contains_key(key) {
			self.active = Some(key.clone());
			true
		} else {
			false
		}
	}

	/// Drop the active option if the view no longer contains it.
	pub fn reconcile(&mut self, filtered: &FilteredIndex) {
		if self
			.active
			.as_ref()
			.is_some_and(|key| !filtered.contains_key(key))
		{
			self.active = None;
		}
	}

	pub fn set_search(&mut self, search: impl Into<String>) {
		self.search = search.into();
	}

	/// Clear the search string. Returns whether it was non-empty.
	pub fn clear_search(&mut self) -> bool {
		let had_text = !self.search.is_empty();
		self.search.clear();
		had_text
	}
}
