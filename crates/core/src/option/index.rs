use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};

use super::OptionKey;
use crate::error::SelectError;

/// Arbitrary structured data attached to an option.
pub type OptionValue = Value;

/// Field that wraps plain string options (`"Blue"` becomes `{"value": "Blue"}`).
pub const STRING_VALUE_FIELD: &str = "value";

/// Ordered `key -> value` mapping derived from a raw option list.
///
/// The index is never patched in place. Whenever the raw options or the
/// tracking field change, a new index is built and replaces the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionIndex {
	entries: IndexMap<OptionKey, OptionValue>,
	track_by_key: Option<String>,
}

impl OptionIndex {
	/// Normalize `raw` into an index.
	///
	/// With `track_by_key` set, every option must be an object carrying that
	/// field, and the field value becomes the key. Without it, every option
	/// must be a plain string keyed by its position.
	pub fn build(raw: &[Value], track_by_key: Option<&str>) -> Result<Self, SelectError> {
		let mut entries = IndexMap::with_capacity(raw.len());

		for (position, option) in raw.iter().enumerate() {
			let (key, value) = match track_by_key {
				Some(field) => tracked_entry(option, field)?,
				None => positional_entry(option, position)?,
			};

			match entries.entry(key) {
				Entry::Occupied(existing) => {
					return Err(SelectError::DuplicateKey {
						key: existing.key().clone(),
					});
				}
				Entry::Vacant(slot) => {
					slot.insert(value);
				}
			}
		}

		tracing::debug!(
			options = entries.len(),
			track_by_key = track_by_key.unwrap_or("<position>"),
			"rebuilt option index"
		);

		Ok(Self {
			entries,
			track_by_key: track_by_key.map(str::to_string),
		})
	}

	/// Field used to key object options, if any.
	#[must_use]
	pub fn track_by_key(&self) -> Option<&str> {
		self.track_by_key.as_deref()
	}

	#[must_use]
	pub fn get(&self, key: &OptionKey) -> Option<&OptionValue> {
		self.entries.get(key)
	}

	#[must_use]
	pub fn contains_key(&self, key: &OptionKey) -> bool {
		self.entries.contains_key(key)
	}

	/// Entry at `position` in input order.
	#[must_use]
	pub fn get_index(&self, position: usize) -> Option<(&OptionKey, &OptionValue)> {
		self.entries.get_index(position)
	}

	/// Position of `key` in input order.
	#[must_use]
	pub fn position_of(&self, key: &OptionKey) -> Option<usize> {
		self.entries.get_index_of(key)
	}

	/// Find the stored key equal to `key`, tolerating integer/string
	/// representation differences such as `1` versus `"1"`.
	#[must_use]
	pub fn resolve_key(&self, key: &OptionKey) -> Option<&OptionKey> {
		if let Some((stored, _)) = self.entries.get_key_value(key) {
			return Some(stored);
		}
		self.entries.keys().find(|stored| stored.matches(key))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &OptionValue)> {
		self.entries.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &OptionKey> {
		self.entries.keys()
	}
}

fn tracked_entry(option: &Value, field: &str) -> Result<(OptionKey, OptionValue), SelectError> {
	let Value::Object(fields) = option else {
		return Err(malformed(option, format!("an object with a '{field}' field")));
	};
	let Some(raw_key) = fields.get(field) else {
		return Err(malformed(option, format!("an object with a '{field}' field")));
	};
	let key = OptionKey::from_json(raw_key).ok_or_else(|| {
		malformed(
			option,
			format!("'{field}' to be an integer or string key"),
		)
	})?;
	Ok((key, option.clone()))
}

fn positional_entry(option: &Value, position: usize) -> Result<(OptionKey, OptionValue), SelectError> {
	let Value::String(text) = option else {
		return Err(malformed(
			option,
			"a plain string because no track_by_key is configured".to_string(),
		));
	};
	let mut wrapper = Map::with_capacity(1);
	wrapper.insert(STRING_VALUE_FIELD.to_string(), Value::String(text.clone()));
	Ok((OptionKey::positional(position), Value::Object(wrapper)))
}

fn malformed(option: &Value, expected: String) -> SelectError {
	SelectError::MalformedOption {
		option: option.to_string(),
		expected,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn colours() -> Vec<Value> {
		vec![json!("Blue"), json!("Red"), json!("Green")]
	}

	#[test]
	fn string_options_are_keyed_by_position() {
		let index = OptionIndex::build(&colours(), None).expect("index");
		let entries: Vec<_> = index.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
		assert_eq!(
			entries,
			vec![
				(OptionKey::from("0"), json!({"value": "Blue"})),
				(OptionKey::from("1"), json!({"value": "Red"})),
				(OptionKey::from("2"), json!({"value": "Green"})),
			]
		);
		assert_eq!(index.track_by_key(), None);
	}

	#[test]
	fn object_options_are_keyed_by_tracked_field() {
		let raw = vec![json!({"id": 1, "value": "Blue"}), json!({"id": 2, "value": "Red"})];
		let index = OptionIndex::build(&raw, Some("id")).expect("index");
		assert_eq!(index.len(), 2);
		assert_eq!(index.get(&OptionKey::Int(1)), Some(&raw[0]));
		assert_eq!(index.get(&OptionKey::Int(2)), Some(&raw[1]));
		assert_eq!(index.position_of(&OptionKey::Int(2)), Some(1));
	}

	#[test]
	fn build_is_deterministic() {
		let raw = vec![json!({"id": "b", "value": "B"}), json!({"id": "a", "value": "A"})];
		let first = OptionIndex::build(&raw, Some("id")).expect("index");
		let second = OptionIndex::build(&raw, Some("id")).expect("index");
		assert_eq!(first, second);
		let keys: Vec<_> = first.keys().cloned().collect();
		assert_eq!(keys, vec![OptionKey::from("b"), OptionKey::from("a")]);
	}

	#[test]
	fn missing_tracked_field_is_malformed() {
		let raw = vec![json!({"id": 1, "value": "Blue"}), json!({"value": "Red"})];
		let err = OptionIndex::build(&raw, Some("id")).expect_err("missing id");
		match err {
			SelectError::MalformedOption { option, expected } => {
				assert!(option.contains("Red"));
				assert!(expected.contains("'id'"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn strings_are_rejected_in_tracked_mode() {
		let err = OptionIndex::build(&[json!("Blue")], Some("id")).expect_err("not an object");
		assert!(matches!(err, SelectError::MalformedOption { .. }));
	}

	#[test]
	fn objects_are_rejected_in_string_mode() {
		let raw = vec![json!("Blue"), json!({"value": "Red"})];
		let err = OptionIndex::build(&raw, None).expect_err("not a string");
		assert!(matches!(err, SelectError::MalformedOption { .. }));
	}

	#[test]
	fn non_scalar_keys_are_rejected() {
		let raw = vec![json!({"id": [1], "value": "Blue"})];
		let err = OptionIndex::build(&raw, Some("id")).expect_err("array key");
		assert!(matches!(err, SelectError::MalformedOption { .. }));
	}

	#[test]
	fn duplicate_keys_are_rejected() {
		let raw = vec![json!({"id": 1, "value": "Blue"}), json!({"id": 1, "value": "Red"})];
		let err = OptionIndex::build(&raw, Some("id")).expect_err("duplicate");
		assert_eq!(err, SelectError::DuplicateKey { key: OptionKey::Int(1) });
	}

	#[test]
	fn resolve_key_tolerates_representation() {
		let index = OptionIndex::build(&colours(), None).expect("index");
		assert_eq!(index.resolve_key(&OptionKey::Int(1)), Some(&OptionKey::from("1")));
		assert_eq!(index.resolve_key(&OptionKey::Int(9)), None);
	}
}
