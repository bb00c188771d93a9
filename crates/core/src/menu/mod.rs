//! Open/close state and keyboard navigation of the option menu.

mod machine;

pub use machine::{Direction, MenuState, MenuStateMachine};
