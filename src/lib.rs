//! Driver support for the `selectbox` binary.
//!
//! The engine lives in `selectbox-core` and its main types are re-exported; this
//! crate adds directory lookup, tracing setup and the scripted session used
//! to exercise a control without a browser.

pub mod app_dirs;
pub mod logging;
pub mod script;

pub use selectbox_core::{OptionKey, Select, SelectConfig, SelectError, SelectEvent};
