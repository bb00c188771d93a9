use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::Value;

use selectbox::script::{Step, parse_script};
use selectbox_core::{MatchMode, MenuLocation, OptionKey, SelectConfig};

use super::ResolvedSettings;
use crate::cli::CliArgs;

/// Mirror of the configuration files before CLI overrides and validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawSettings {
	pub(super) select: SelectSection,
	pub(super) options: OptionsSection,
	pub(super) script: ScriptSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct SelectSection {
	pub(super) track_by_key: Option<String>,
	#[serde(alias = "label_key")]
	pub(super) label_field: Option<String>,
	pub(super) close_on_select: Option<bool>,
	pub(super) open_on_click: Option<bool>,
	pub(super) listbox: Option<bool>,
	pub(super) multiple: Option<bool>,
	pub(super) maximum_selections: Option<usize>,
	pub(super) minimum_selections: Option<usize>,
	pub(super) drop_down_max_height: Option<u32>,
	pub(super) clear_search_string_on_blur: Option<bool>,
	pub(super) menu_location: Option<MenuLocation>,
	pub(super) match_mode: Option<MatchMode>,
	pub(super) placeholder: Option<String>,
	pub(super) html_id: Option<String>,
	pub(super) close_on_scroll: Option<bool>,
	pub(super) animate_transitions: Option<bool>,
	/// Keys selected before the script runs.
	pub(super) selected: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct OptionsSection {
	/// JSON file holding the option array. Wins over `items`.
	pub(super) file: Option<PathBuf>,
	pub(super) items: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ScriptSection {
	pub(super) file: Option<PathBuf>,
	/// Steps appended after the script file.
	pub(super) steps: Option<Vec<String>>,
}

impl RawSettings {
	/// Apply CLI overrides on top of the file and environment values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		let select = &mut self.select;
		if let Some(field) = cli.track_by_key.clone() {
			select.track_by_key = Some(field);
		}
		if let Some(field) = cli.label_field.clone() {
			select.label_field = Some(field);
		}
		if let Some(value) = cli.multiple {
			select.multiple = Some(value);
		}
		if let Some(value) = cli.maximum_selections {
			select.maximum_selections = Some(value);
		}
		if let Some(value) = cli.minimum_selections {
			select.minimum_selections = Some(value);
		}
		if let Some(value) = cli.listbox {
			select.listbox = Some(value);
		}
		if let Some(value) = cli.close_on_select {
			select.close_on_select = Some(value);
		}
		if let Some(value) = cli.open_on_click {
			select.open_on_click = Some(value);
		}
		if let Some(mode) = cli.match_mode {
			select.match_mode = Some(mode.into());
		}
		if let Some(location) = cli.menu_location {
			select.menu_location = Some(location.into());
		}
		if let Some(text) = cli.placeholder.clone() {
			select.placeholder = Some(text);
		}
		if let Some(keys) = &cli.selected {
			select.selected = Some(keys.iter().map(|key| Value::from(key.as_str())).collect());
		}

		if let Some(path) = cli.options.clone() {
			self.options.file = Some(path);
		}
		if let Some(path) = cli.script.clone() {
			self.script.file = Some(path);
		}
		if !cli.steps.is_empty() {
			self.script
				.steps
				.get_or_insert_with(Vec::new)
				.extend(cli.steps.iter().cloned());
		}
	}

	/// Fill defaults, load referenced files and validate the result.
	pub(super) fn resolve(self) -> Result<ResolvedSettings> {
		let select = self.select.to_config();
		select
			.validate()
			.context("invalid [select] configuration")?;

		let options = match (&self.options.file, self.options.items) {
			(Some(path), _) => read_options(path)?,
			(None, Some(items)) => items,
			(None, None) => {
				tracing::warn!("no options configured; the control starts empty");
				Vec::new()
			}
		};

		let selected = self
			.select
			.selected
			.unwrap_or_default()
			.iter()
			.map(|raw| {
				selected_key(raw).ok_or_else(|| anyhow!("selected key {raw} is not a string or integer"))
			})
			.collect::<Result<Vec<_>>>()?;

		let mut steps = match &self.script.file {
			Some(path) => read_script(path)?,
			None => Vec::new(),
		};
		for (index, line) in self.script.steps.unwrap_or_default().iter().enumerate() {
			let step: Step = line
				.trim()
				.parse()
				.map_err(|message| anyhow!("inline step {} ('{line}'): {message}", index + 1))?;
			steps.push(step);
		}

		Ok(ResolvedSettings {
			select,
			options,
			options_file: self.options.file,
			selected,
			script_file: self.script.file,
			steps,
		})
	}
}

impl SelectSection {
	fn to_config(&self) -> SelectConfig {
		let defaults = SelectConfig::default();
		SelectConfig {
			track_by_key: self.track_by_key.clone(),
			label_field: self.label_field.clone().unwrap_or(defaults.label_field),
			close_on_select: self.close_on_select.unwrap_or(defaults.close_on_select),
			open_on_click: self.open_on_click.unwrap_or(defaults.open_on_click),
			listbox: self.listbox.unwrap_or(defaults.listbox),
			multiple: self.multiple.unwrap_or(defaults.multiple),
			maximum_selections: self
				.maximum_selections
				.unwrap_or(defaults.maximum_selections),
			minimum_selections: self
				.minimum_selections
				.unwrap_or(defaults.minimum_selections),
			drop_down_max_height: self
				.drop_down_max_height
				.unwrap_or(defaults.drop_down_max_height),
			clear_search_string_on_blur: self
				.clear_search_string_on_blur
				.unwrap_or(defaults.clear_search_string_on_blur),
			menu_location: self.menu_location.unwrap_or(defaults.menu_location),
			match_mode: self.match_mode.unwrap_or(defaults.match_mode),
			placeholder: self.placeholder.clone().unwrap_or(defaults.placeholder),
			html_id: self.html_id.clone().or(defaults.html_id),
			close_on_scroll: self.close_on_scroll.unwrap_or(defaults.close_on_scroll),
			animate_transitions: self
				.animate_transitions
				.unwrap_or(defaults.animate_transitions),
		}
	}
}

/// Keys arrive as TOML/env scalars; numeric strings become integer keys.
fn selected_key(raw: &Value) -> Option<OptionKey> {
	match raw {
		Value::String(text) => Some(OptionKey::parse(text)),
		other => OptionKey::from_json(other),
	}
}

fn read_options(path: &Path) -> Result<Vec<Value>> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("failed to read options file {}", path.display()))?;
	let value: Value = serde_json::from_str(&text)
		.with_context(|| format!("options file {} is not valid JSON", path.display()))?;
	match value {
		Value::Array(options) => Ok(options),
		_ => bail!("options file {} must hold a JSON array", path.display()),
	}
}

fn read_script(path: &Path) -> Result<Vec<Step>> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("failed to read script {}", path.display()))?;
	parse_script(&text).with_context(|| format!("invalid script {}", path.display()))
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use clap::Parser;
	use tempfile::NamedTempFile;

	use super::*;

	#[test]
	fn cli_overrides_take_precedence() {
		let cli = CliArgs::parse_from([
			"selectbox",
			"--track-by-key",
			"id",
			"--label-field",
			"name",
			"--multiple",
			"true",
			"--max",
			"2",
			"--match-mode",
			"fuzzy",
			"--menu-location",
			"above",
			"--selected",
			"1,2",
			"--step",
			"open",
		]);

		let mut raw = RawSettings::default();
		raw.select.multiple = Some(false);
		raw.script.steps = Some(vec!["frame".into()]);
		raw.apply_cli_overrides(&cli);

		assert_eq!(raw.select.track_by_key.as_deref(), Some("id"));
		assert_eq!(raw.select.label_field.as_deref(), Some("name"));
		assert_eq!(raw.select.multiple, Some(true));
		assert_eq!(raw.select.maximum_selections, Some(2));
		assert_eq!(raw.select.match_mode, Some(MatchMode::Fuzzy));
		assert_eq!(raw.select.menu_location, Some(MenuLocation::Above));
		assert_eq!(
			raw.script.steps,
			Some(vec!["frame".to_string(), "open".to_string()])
		);
	}

	#[test]
	fn resolve_fills_defaults() {
		let resolved = RawSettings::default().resolve().expect("resolve");
		assert_eq!(resolved.select, SelectConfig::default());
		assert!(resolved.options.is_empty());
		assert!(resolved.steps.is_empty());
	}

	#[test]
	fn resolve_reads_options_and_script_files() {
		let mut options = NamedTempFile::new().expect("options file");
		write!(options, r#"[{{"id": 1, "name": "Ada"}}, {{"id": 2, "name": "Grace"}}]"#)
			.expect("write options");
		let mut script = NamedTempFile::new().expect("script file");
		writeln!(script, "# open and pick\nopen\npick 2").expect("write script");

		let mut raw = RawSettings::default();
		raw.select.track_by_key = Some("id".into());
		raw.select.selected = Some(vec![Value::from("1")]);
		raw.options.file = Some(options.path().to_path_buf());
		raw.options.items = Some(vec![Value::from("ignored")]);
		raw.script.file = Some(script.path().to_path_buf());
		raw.script.steps = Some(vec!["frame".into()]);

		let resolved = raw.resolve().expect("resolve");
		assert_eq!(resolved.options.len(), 2);
		assert_eq!(resolved.selected, vec![OptionKey::Int(1)]);
		assert_eq!(
			resolved.steps,
			vec![Step::Open, Step::Pick(OptionKey::Int(2)), Step::Frame]
		);
	}

	#[test]
	fn resolve_rejects_bad_inputs() {
		let mut raw = RawSettings::default();
		raw.select.minimum_selections = Some(3);
		raw.select.maximum_selections = Some(1);
		assert!(raw.resolve().is_err());

		let mut options = NamedTempFile::new().expect("options file");
		write!(options, r#"{{"not": "an array"}}"#).expect("write options");
		let mut raw = RawSettings::default();
		raw.options.file = Some(options.path().to_path_buf());
		let err = raw.resolve().expect_err("object is not an option list");
		assert!(err.to_string().contains("must hold a JSON array"));

		let mut raw = RawSettings::default();
		raw.script.steps = Some(vec!["dance".into()]);
		let err = raw.resolve().expect_err("unknown step");
		assert!(err.to_string().contains("inline step 1"));
	}
}
