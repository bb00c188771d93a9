//! Configuration loading and resolution.
//!
//! `load` layers configuration files, environment variables and CLI flags,
//! then resolves them into [`ResolvedSettings`] ready for a session.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde_json::Value;

use selectbox::script::Step;
use selectbox_core::{OptionKey, SelectConfig};

use crate::cli::CliArgs;

mod raw;
mod sources;

use raw::RawSettings;

/// Everything the driver needs to mount a control and replay a script.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSettings {
	pub(crate) select: SelectConfig,
	pub(crate) options: Vec<Value>,
	pub(crate) options_file: Option<PathBuf>,
	pub(crate) selected: Vec<OptionKey>,
	pub(crate) script_file: Option<PathBuf>,
	pub(crate) steps: Vec<Step>,
}

/// Load configuration from every source and apply CLI overrides.
pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedSettings> {
	let config = sources::build_config(cli)?;
	let mut raw: RawSettings = config
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	raw.resolve()
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "enabled" } else { "disabled" }
}

impl ResolvedSettings {
	/// Print a human readable summary of the effective configuration.
	pub(crate) fn print_summary(&self) {
		let select = &self.select;
		println!("Effective configuration:");
		println!(
			"  Track by key: {}",
			select.track_by_key.as_deref().unwrap_or("(position)")
		);
		println!("  Label field: {}", select.label_field);
		println!("  Multiple: {}", bool_to_word(select.multiple));
		match select.maximum_selections {
			0 => println!("  Maximum selections: unlimited"),
			max => println!("  Maximum selections: {max}"),
		}
		if select.minimum_selections > 0 {
			println!("  Minimum selections: {}", select.minimum_selections);
		}
		println!("  Listbox: {}", bool_to_word(select.listbox));
		println!("  Close on select: {}", bool_to_word(select.close_on_select));
		println!("  Open on click: {}", bool_to_word(select.open_on_click));
		println!(
			"  Clear search on blur: {}",
			bool_to_word(select.clear_search_string_on_blur)
		);
		println!("  Close on scroll: {}", bool_to_word(select.close_on_scroll));
		println!("  Match mode: {}", select.match_mode.as_str());
		println!("  Menu location: {:?}", select.menu_location);
		println!("  Dropdown max height: {}px", select.drop_down_max_height);
		println!("  Placeholder: {}", select.placeholder);
		match &self.options_file {
			Some(path) => println!(
				"  Options: {} from {}",
				self.options.len(),
				path.display()
			),
			None => println!("  Options: {} inline", self.options.len()),
		}
		if !self.selected.is_empty() {
			let keys: Vec<_> = self.selected.iter().map(ToString::to_string).collect();
			println!("  Selected: {}", keys.join(", "));
		}
		if let Some(path) = &self.script_file {
			println!("  Script: {}", path.display());
		}
		println!("  Steps: {}", self.steps.len());
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use clap::Parser;

	use super::*;

	#[test]
	fn explicit_config_file_is_merged() {
		let mut file = tempfile::Builder::new()
			.suffix(".toml")
			.tempfile()
			.expect("config file");
		writeln!(
			file,
			"[select]\nmultiple = true\nlabel_key = \"name\"\ntrack_by_key = \"id\"\nmatch_mode = \"prefix\"\n\n\
			 [options]\nitems = [{{ id = 1, name = \"Ada\" }}, {{ id = 2, name = \"Grace\" }}]\n\n\
			 [script]\nsteps = [\"open\", \"pick 2\"]"
		)
		.expect("write config");

		let path = file.path().to_string_lossy().into_owned();
		let cli = CliArgs::parse_from(["selectbox", "--no-config", "--config", &path, "--max", "1"]);
		let resolved = load(&cli).expect("load");

		assert!(resolved.select.multiple);
		assert_eq!(resolved.select.label_field, "name");
		assert_eq!(resolved.select.maximum_selections, 1);
		assert_eq!(resolved.select.match_mode, selectbox_core::MatchMode::Prefix);
		assert_eq!(resolved.options.len(), 2);
		assert_eq!(resolved.steps.len(), 2);
	}

	#[test]
	fn missing_explicit_config_is_an_error() {
		let cli = CliArgs::parse_from([
			"selectbox",
			"--no-config",
			"--config",
			"/nonexistent/selectbox-test.toml",
		]);
		assert!(load(&cli).is_err());
	}
}
