use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use selectbox::app_dirs;

use crate::cli::CliArgs;

const ENV_PREFIX: &str = "SELECTBOX";

/// Keys whose environment value is a comma separated list.
const LIST_KEYS: &[&str] = &["select.selected"];

/// One configuration file feeding the select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum FileLayer {
	/// Well-known location, skipped when absent.
	Discovered(PathBuf),
	/// Named with `--config`; must exist.
	Explicit(PathBuf),
}

impl FileLayer {
	fn into_parts(self) -> (PathBuf, bool) {
		match self {
			Self::Discovered(path) => (path, false),
			Self::Explicit(path) => (path, true),
		}
	}
}

/// Files to merge for this invocation, lowest precedence first.
pub(super) fn file_layers(cli: &CliArgs) -> Vec<FileLayer> {
	let mut layers = Vec::new();
	if !cli.no_config {
		layers.extend(default_config_files().into_iter().map(FileLayer::Discovered));
	}
	layers.extend(cli.config.iter().cloned().map(FileLayer::Explicit));
	layers
}

/// `SELECTBOX__SECTION__KEY` variables, e.g. `SELECTBOX__SELECT__MULTIPLE=true`.
pub(super) fn environment() -> Environment {
	let mut source = Environment::with_prefix(ENV_PREFIX)
		.separator("__")
		.try_parsing(true)
		.list_separator(",");
	for key in LIST_KEYS {
		source = source.with_list_parse_key(key);
	}
	source
}

/// Merge the file layers, then the environment on top.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
	let builder = file_layers(cli)
		.into_iter()
		.fold(Config::builder(), |builder, layer| {
			let (path, required) = layer.into_parts();
			builder.add_source(File::from(path).required(required))
		});

	builder
		.add_source(environment())
		.build()
		.context("failed to assemble the select configuration")
}

/// The user config dir, then `.selectbox.toml` and `selectbox.toml` in the
/// working directory.
pub(super) fn default_config_files() -> Vec<PathBuf> {
	let mut files = Vec::new();

	if let Ok(dir) = app_dirs::get_config_dir() {
		files.push(dir.join("config.toml"));
	}

	if let Ok(current_dir) = env::current_dir() {
		files.push(current_dir.join(".selectbox.toml"));
		files.push(current_dir.join("selectbox.toml"));
	}

	files
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use selectbox_core::OptionKey;

	use super::*;
	use crate::settings::raw::RawSettings;

	#[test]
	fn default_files_include_current_directory_variants() {
		let files = default_config_files();
		assert!(files.iter().any(|path| path.ends_with(".selectbox.toml")));
		assert!(files.iter().any(|path| path.ends_with("selectbox.toml")));
	}

	#[test]
	fn explicit_files_follow_discovered_ones() {
		let cli = CliArgs::parse_from(["selectbox", "--config", "a.toml", "--config", "b.toml"]);
		let layers = file_layers(&cli);
		let explicit: Vec<_> = layers
			.iter()
			.filter_map(|layer| match layer {
				FileLayer::Explicit(path) => Some(path.clone()),
				FileLayer::Discovered(_) => None,
			})
			.collect();
		assert_eq!(explicit, vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]);
		assert!(matches!(layers.first(), Some(FileLayer::Discovered(_))));
		assert!(matches!(layers.last(), Some(FileLayer::Explicit(_))));

		let cli = CliArgs::parse_from(["selectbox", "--no-config", "--config", "a.toml"]);
		assert_eq!(
			file_layers(&cli),
			vec![FileLayer::Explicit(PathBuf::from("a.toml"))]
		);
	}

	#[test]
	fn environment_sets_select_fields_and_key_lists() {
		let vars = config::Map::from([
			("SELECTBOX__SELECT__MULTIPLE".to_string(), "true".to_string()),
			("SELECTBOX__SELECT__SELECTED".to_string(), "1,ada".to_string()),
		]);
		let config = Config::builder()
			.add_source(environment().source(Some(vars)))
			.build()
			.expect("build");
		let raw: RawSettings = config.try_deserialize().expect("deserialize");
		let resolved = raw.resolve().expect("resolve");

		assert!(resolved.select.multiple);
		assert_eq!(
			resolved.selected,
			vec![OptionKey::Int(1), OptionKey::from("ada")]
		);
	}
}
