//! Headless engine for a searchable select / combobox control.
//!
//! The crate normalizes raw options into a key-addressable index, filters it
//! against a search string, drives the open/close menu state and keyboard
//! navigation, tracks single or multi selections, and reports interactions
//! that land outside the control. Rendering stays with the host: it feeds
//! input into a [`Select`] and drains the [`SelectEvent`]s and
//! [`ViewRequest`]s the control queues.

pub mod config;
pub mod error;
pub mod events;
pub mod focus;
pub mod input;
pub mod menu;
pub mod option;
pub mod placement;
pub mod search;
pub mod select;
pub mod selection;

pub use crate::config::SelectConfig;
pub use crate::error::SelectError;
pub use crate::events::{SelectEvent, ViewRequest};
pub use crate::focus::{
	BoundaryId, Document, ElementId, FocusOutsideDetector, Interaction, Registration, TreeDocument,
};
pub use crate::input::Key;
pub use crate::menu::{Direction, MenuState, MenuStateMachine};
pub use crate::option::{OptionIndex, OptionKey, OptionValue};
pub use crate::placement::{
	MENU_OFFSET_PX, MenuLocation, Placement, PlacementRequest, Positioner, Rect, Side,
};
pub use crate::search::{FilteredIndex, MatchMode, MatcherCallback, SearchMatcher, filter};
pub use crate::select::Select;
pub use crate::selection::{CommitOutcome, Selection, SelectionChange, SelectionCoordinator};
