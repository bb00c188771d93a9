//! Scripted driver for a headless select control.
//!
//! A script is a list of [`Step`]s replayed against a [`Session`], which
//! mounts the control in a [`HeadlessDocument`] and records the events and
//! view requests each step produced.

mod document;
mod session;
mod step;

use selectbox_core::SelectError;
use thiserror::Error;

pub use document::{HeadlessDocument, ViewportPositioner};
pub use session::{FinalState, Session, StepRecord, Transcript, event_json};
pub use step::{Element, Step, parse_script};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScriptError {
	#[error("line {line}: {message}")]
	Parse { line: usize, message: String },

	#[error("step '{step}' failed: {source}")]
	Step {
		step: String,
		#[source]
		source: SelectError,
	},
}
