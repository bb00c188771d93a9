use thiserror::Error;

use crate::option::OptionKey;

/// Errors raised while building the option index or filtering it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
	/// A raw option could not be normalized into a key/value pair.
	#[error("option {option} is malformed: expected {expected}")]
	MalformedOption { option: String, expected: String },

	/// Two raw options resolved to the same key under `track_by_key`.
	#[error("option key {key} appears more than once")]
	DuplicateKey { key: OptionKey },

	/// The default matcher needed a label that the option does not carry.
	#[error("option {key} has no string label field '{field}'")]
	LabelFieldMissing { key: OptionKey, field: String },

	/// A key handed to the control does not name any option.
	#[error("no option has key {key}")]
	UnknownKey { key: OptionKey },

	/// The configuration cannot be used as given.
	#[error("invalid select configuration: {0}")]
	InvalidConfig(String),
}
