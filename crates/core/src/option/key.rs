use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier of a single option.
///
/// Keys read from a `track_by_key` field keep their JSON type, while keys
/// generated for plain string options are the stringified position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionKey {
	Int(i64),
	Str(String),
}

impl OptionKey {
	/// Key generated for the option at `position` in a string option list.
	#[must_use]
	pub fn positional(position: usize) -> Self {
		Self::Str(position.to_string())
	}

	/// Interpret a JSON scalar as a key. Only integers and strings qualify.
	#[must_use]
	pub fn from_json(value: &Value) -> Option<Self> {
		match value {
			Value::String(text) => Some(Self::Str(text.clone())),
			Value::Number(number) => number.as_i64().map(Self::Int),
			_ => None,
		}
	}

	/// Parse user supplied text, preferring the integer form when the text
	/// is the canonical spelling of that integer. `"007"` or `"+5"` stay
	/// strings so they can still name string keys.
	#[must_use]
	pub fn parse(text: &str) -> Self {
		match text.parse::<i64>() {
			Ok(number) if number.to_string() == text => Self::Int(number),
			_ => Self::Str(text.to_string()),
		}
	}

	/// Loose comparison that treats `1` and `"1"` as the same key.
	#[must_use]
	pub fn matches(&self, other: &OptionKey) -> bool {
		match (self, other) {
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::Int(a), Self::Str(b)) | (Self::Str(b), Self::Int(a)) => a.to_string() == *b,
		}
	}

	/// JSON form of the key.
	#[must_use]
	pub fn to_json(&self) -> Value {
		match self {
			Self::Int(number) => Value::from(*number),
			Self::Str(text) => Value::from(text.as_str()),
		}
	}
}

impl fmt::Display for OptionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(number) => write!(f, "{number}"),
			Self::Str(text) => f.write_str(text),
		}
	}
}

impl From<i64> for OptionKey {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<&str> for OptionKey {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for OptionKey {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn keys_from_json_accept_integers_and_strings_only() {
		assert_eq!(OptionKey::from_json(&json!(7)), Some(OptionKey::Int(7)));
		assert_eq!(OptionKey::from_json(&json!("a")), Some(OptionKey::from("a")));
		assert_eq!(OptionKey::from_json(&json!(1.5)), None);
		assert_eq!(OptionKey::from_json(&json!(null)), None);
		assert_eq!(OptionKey::from_json(&json!({"id": 1})), None);
	}

	#[test]
	fn parse_prefers_integers() {
		assert_eq!(OptionKey::parse("12"), OptionKey::Int(12));
		assert_eq!(OptionKey::parse("-3"), OptionKey::Int(-3));
		assert_eq!(OptionKey::parse("red"), OptionKey::from("red"));
	}

	#[test]
	fn parse_keeps_non_canonical_numbers_as_text() {
		assert_eq!(OptionKey::parse("007"), OptionKey::from("007"));
		assert_eq!(OptionKey::parse("+5"), OptionKey::from("+5"));
		assert_eq!(OptionKey::parse("-0"), OptionKey::from("-0"));
		assert!(!OptionKey::parse("007").matches(&OptionKey::Int(7)));
	}

	#[test]
	fn loose_matching_ignores_representation() {
		assert!(OptionKey::Int(1).matches(&OptionKey::from("1")));
		assert!(!OptionKey::Int(1).matches(&OptionKey::from("01")));
		assert_eq!(OptionKey::positional(3).to_string(), "3");
	}
}
