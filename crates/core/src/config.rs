//! Configuration surface of a select control.

use serde::{Deserialize, Serialize};

use crate::error::SelectError;
use crate::placement::MenuLocation;
use crate::search::MatchMode;

/// Options accepted by [`Select`](crate::Select).
///
/// Every field is optional when deserializing; missing fields fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
	/// Field that keys object options. `None` means options are strings.
	pub track_by_key: Option<String>,
	/// Field holding the display label of object options.
	#[serde(alias = "label_key")]
	pub label_field: String,
	/// Close the menu once an option is committed. Ignored in listbox mode.
	pub close_on_select: bool,
	/// Open the menu when the control is clicked.
	pub open_on_click: bool,
	/// Keep the option list permanently visible.
	pub listbox: bool,
	/// Allow more than one selected option.
	pub multiple: bool,
	/// Upper bound on selected options; 0 means unlimited.
	pub maximum_selections: usize,
	/// Advisory lower bound on selected options.
	pub minimum_selections: usize,
	/// Maximum dropdown height in pixels.
	pub drop_down_max_height: u32,
	pub clear_search_string_on_blur: bool,
	pub menu_location: MenuLocation,
	pub match_mode: MatchMode,
	/// Text shown when nothing is selected.
	pub placeholder: String,
	/// Element id of the control. Generated when absent.
	pub html_id: Option<String>,
	/// Close the menu when the window scrolls.
	pub close_on_scroll: bool,
	/// Gate re-opening on open/close animations finishing.
	pub animate_transitions: bool,
}

impl Default for SelectConfig {
	fn default() -> Self {
		Self {
			track_by_key: None,
			label_field: "value".to_string(),
			close_on_select: true,
			open_on_click: false,
			listbox: false,
			multiple: false,
			maximum_selections: 0,
			minimum_selections: 0,
			drop_down_max_height: 300,
			clear_search_string_on_blur: false,
			menu_location: MenuLocation::Auto,
			match_mode: MatchMode::Substring,
			placeholder: "Select a value".to_string(),
			html_id: None,
			close_on_scroll: true,
			animate_transitions: true,
		}
	}
}

impl SelectConfig {
	/// Reject combinations the engine cannot honour.
	pub fn validate(&self) -> Result<(), SelectError> {
		if self.label_field.trim().is_empty() {
			return Err(SelectError::InvalidConfig(
				"label_field must not be empty".into(),
			));
		}
		if self
			.track_by_key
			.as_deref()
			.is_some_and(|field| field.trim().is_empty())
		{
			return Err(SelectError::InvalidConfig(
				"track_by_key must not be empty when set".into(),
			));
		}
		if self.maximum_selections > 0 && self.maximum_selections < self.minimum_selections {
			return Err(SelectError::InvalidConfig(format!(
				"maximum_selections ({}) is below minimum_selections ({})",
				self.maximum_selections, self.minimum_selections
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_documented_surface() {
		let config = SelectConfig::default();
		assert_eq!(config.track_by_key, None);
		assert_eq!(config.label_field, "value");
		assert!(config.close_on_select);
		assert!(!config.open_on_click);
		assert!(!config.listbox);
		assert_eq!(config.maximum_selections, 0);
		assert_eq!(config.drop_down_max_height, 300);
		assert_eq!(config.menu_location, MenuLocation::Auto);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn partial_json_fills_in_defaults() {
		let config: SelectConfig =
			serde_json::from_str(r#"{"track_by_key": "id", "label_key": "name", "menu_location": "above"}"#)
				.expect("config");
		assert_eq!(config.track_by_key.as_deref(), Some("id"));
		assert_eq!(config.label_field, "name");
		assert_eq!(config.menu_location, MenuLocation::Above);
		assert!(config.close_on_select);
	}

	#[test]
	fn validate_rejects_inverted_limits() {
		let config = SelectConfig {
			multiple: true,
			minimum_selections: 3,
			maximum_selections: 2,
			..SelectConfig::default()
		};
		assert!(matches!(config.validate(), Err(SelectError::InvalidConfig(_))));

		let unlimited = SelectConfig {
			minimum_selections: 3,
			..SelectConfig::default()
		};
		assert!(unlimited.validate().is_ok());
	}

	#[test]
	fn validate_rejects_blank_fields() {
		let config = SelectConfig {
			label_field: " ".into(),
			..SelectConfig::default()
		};
		assert!(config.validate().is_err());

		let config = SelectConfig {
			track_by_key: Some(String::new()),
			..SelectConfig::default()
		};
		assert!(config.validate().is_err());
	}
}
