use std::fmt;
use std::sync::Arc;

use frizbee::{Config, match_list};
use serde::{Deserialize, Serialize};

use crate::error::SelectError;
use crate::option::{OptionKey, OptionValue, STRING_VALUE_FIELD};

/// User supplied predicate deciding whether an option matches a search.
///
/// Receives the raw search string, the option value and its key.
pub type MatcherCallback = Arc<dyn Fn(&str, &OptionValue, &OptionKey) -> bool>;

/// How the built-in matcher compares the search against an option label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
	/// Case-insensitive substring match.
	#[default]
	Substring,
	/// Case-insensitive prefix match.
	Prefix,
	/// Typo-tolerant fuzzy match.
	Fuzzy,
}

impl MatchMode {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Substring => "substring",
			Self::Prefix => "prefix",
			Self::Fuzzy => "fuzzy",
		}
	}

	/// Compare an already trimmed and lower-cased needle against `label`.
	#[must_use]
	pub fn matches(self, needle: &str, label: &str) -> bool {
		let haystack = label.trim().to_lowercase();
		match self {
			Self::Substring => haystack.contains(needle),
			Self::Prefix => haystack.starts_with(needle),
			Self::Fuzzy => fuzzy_matches(needle, &haystack),
		}
	}
}

impl std::str::FromStr for MatchMode {
	type Err = SelectError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"substring" => Ok(Self::Substring),
			"prefix" => Ok(Self::Prefix),
			"fuzzy" => Ok(Self::Fuzzy),
			other => Err(SelectError::InvalidConfig(format!(
				"unknown match mode '{other}'"
			))),
		}
	}
}

/// Strategy used by the search filter.
#[derive(Clone)]
pub enum SearchMatcher {
	Default(MatchMode),
	Custom(MatcherCallback),
}

impl SearchMatcher {
	/// Wrap a closure as a custom matcher.
	pub fn custom<F>(callback: F) -> Self
	where
		F: Fn(&str, &OptionValue, &OptionKey) -> bool + 'static,
	{
		Self::Custom(Arc::new(callback))
	}
}

impl Default for SearchMatcher {
	fn default() -> Self {
		Self::Default(MatchMode::default())
	}
}

impl fmt::Debug for SearchMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default(mode) => f.debug_tuple("Default").field(mode).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// Resolve the display label of an option.
///
/// String options always use their wrapped string; object options use
/// `label_field`.
pub fn label_of<'a>(
	key: &OptionKey,
	value: &'a OptionValue,
	label_field: &str,
	string_mode: bool,
) -> Result<&'a str, SelectError> {
	let field = if string_mode {
		STRING_VALUE_FIELD
	} else {
		label_field
	};
	value
		.get(field)
		.and_then(|label| label.as_str())
		.ok_or_else(|| SelectError::LabelFieldMissing {
			key: key.clone(),
			field: field.to_string(),
		})
}

fn fuzzy_config(needle: &str) -> Config {
	let length = needle.chars().count();
	let allowed_typos: u16 = match length {
		0..=2 => 0,
		3..=5 => 1,
		_ => 2,
	};

	Config {
		prefilter: true,
		max_typos: Some(allowed_typos),
		sort: false,
		..Config::default()
	}
}

fn fuzzy_matches(needle: &str, haystack: &str) -> bool {
	let config = fuzzy_config(needle);
	let haystacks = [haystack];
	match_list(needle, &haystacks, &config)
		.iter()
		.any(|entry| entry.score > 0)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn substring_and_prefix_modes_differ() {
		assert!(MatchMode::Substring.matches("re", "Green"));
		assert!(!MatchMode::Prefix.matches("re", "Green"));
		assert!(MatchMode::Prefix.matches("gr", "  Green "));
	}

	#[test]
	fn fuzzy_mode_accepts_exact_substrings() {
		assert!(MatchMode::Fuzzy.matches("blu", "blue"));
	}

	#[test]
	fn match_mode_parses_names() {
		assert_eq!("Prefix".parse::<MatchMode>(), Ok(MatchMode::Prefix));
		assert!("regex".parse::<MatchMode>().is_err());
	}

	#[test]
	fn label_of_uses_wrapper_in_string_mode() {
		let value = json!({"value": "Blue"});
		let key = OptionKey::from("0");
		assert_eq!(label_of(&key, &value, "name", true), Ok("Blue"));
		assert_eq!(
			label_of(&key, &value, "name", false),
			Err(SelectError::LabelFieldMissing {
				key,
				field: "name".into()
			})
		);
	}
}
