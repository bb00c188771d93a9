use std::fmt::Write;
use std::path::PathBuf;

use clap::{
	ArgAction, ColorChoice, Parser, ValueEnum,
	builder::{
		BoolishValueParser, Styles,
		styling::{AnsiColor, Effects},
	},
};
use selectbox::app_dirs;
use selectbox_core::{MatchMode, MenuLocation};

/// Produce the full version banner including the config directory.
fn long_version() -> &'static str {
	let config_dir = match app_dirs::get_config_dir() {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};

	let mut details = format!("selectbox {}", env!("CARGO_PKG_VERSION"));
	let _ = writeln!(details);
	let _ = writeln!(details, "config directory: {config_dir}");

	Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into [`CliArgs`].
pub(crate) fn parse_cli() -> CliArgs {
	CliArgs::parse()
}

#[derive(Parser, Debug)]
#[command(
	name = "selectbox",
	version,
	long_version = long_version(),
	about = "Replay interaction scripts against a headless select control",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
/// Command-line arguments accepted by the `selectbox` binary.
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "SELECTBOX_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'i',
		long,
		value_name = "FILE",
		help = "JSON file holding the option array (default: options from configuration)"
	)]
	pub(crate) options: Option<PathBuf>,
	#[arg(
		short,
		long,
		value_name = "FILE",
		help = "Script of interaction steps, one per line (default: none)"
	)]
	pub(crate) script: Option<PathBuf>,
	#[arg(
		long = "step",
		value_name = "STEP",
		action = ArgAction::Append,
		help = "Inline step appended after the script, e.g. 'type re' (default: none)"
	)]
	pub(crate) steps: Vec<String>,
	#[arg(
		long,
		value_delimiter = ',',
		value_name = "KEY",
		help = "Comma-separated keys selected before the script runs (default: none)"
	)]
	pub(crate) selected: Option<Vec<String>>,
	#[arg(
		short = 'k',
		long = "track-by-key",
		value_name = "FIELD",
		help = "Field that keys object options (default: options are strings)"
	)]
	pub(crate) track_by_key: Option<String>,
	#[arg(
		short = 'l',
		long = "label-field",
		value_name = "FIELD",
		help = "Field holding the label of object options (default: value)"
	)]
	pub(crate) label_field: Option<String>,
	#[arg(
		short = 'm',
		long,
		value_parser = BoolishValueParser::new(),
		help = "Allow several selected options (default: disabled)"
	)]
	pub(crate) multiple: Option<bool>,
	#[arg(
		long = "max",
		value_name = "NUM",
		help = "Maximum number of selected options (default: unlimited)"
	)]
	pub(crate) maximum_selections: Option<usize>,
	#[arg(
		long = "min",
		value_name = "NUM",
		help = "Advisory minimum number of selected options (default: 0)"
	)]
	pub(crate) minimum_selections: Option<usize>,
	#[arg(
		long,
		value_parser = BoolishValueParser::new(),
		help = "Keep the option list permanently open (default: disabled)"
	)]
	pub(crate) listbox: Option<bool>,
	#[arg(
		long = "close-on-select",
		value_parser = BoolishValueParser::new(),
		help = "Close the menu after a commit (default: enabled)"
	)]
	pub(crate) close_on_select: Option<bool>,
	#[arg(
		long = "open-on-click",
		value_parser = BoolishValueParser::new(),
		help = "Open the menu when the control is clicked (default: disabled)"
	)]
	pub(crate) open_on_click: Option<bool>,
	#[arg(
		long = "match-mode",
		value_enum,
		help = "Built-in search matcher (default: substring)"
	)]
	pub(crate) match_mode: Option<MatchModeArg>,
	#[arg(
		long = "menu-location",
		value_enum,
		help = "Where the dropdown opens (default: auto)"
	)]
	pub(crate) menu_location: Option<MenuLocationArg>,
	#[arg(
		long,
		value_name = "TEXT",
		help = "Text shown when nothing is selected (default: Select a value)"
	)]
	pub(crate) placeholder: Option<String>,
	#[arg(
		short = 'p',
		long = "print-config",
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short,
		long,
		help = "Log engine activity to stderr; SELECTBOX_LOG takes precedence (default: disabled)"
	)]
	pub(crate) verbose: bool,
	#[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Plain, help = "Choose how to print the transcript")]
	pub(crate) output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum MatchModeArg {
	Substring,
	Prefix,
	Fuzzy,
}

impl From<MatchModeArg> for MatchMode {
	fn from(arg: MatchModeArg) -> Self {
		match arg {
			MatchModeArg::Substring => MatchMode::Substring,
			MatchModeArg::Prefix => MatchMode::Prefix,
			MatchModeArg::Fuzzy => MatchMode::Fuzzy,
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum MenuLocationArg {
	Auto,
	Above,
	Below,
}

impl From<MenuLocationArg> for MenuLocation {
	fn from(arg: MenuLocationArg) -> Self {
		match arg {
			MenuLocationArg::Auto => MenuLocation::Auto,
			MenuLocationArg::Above => MenuLocation::Above,
			MenuLocationArg::Below => MenuLocation::Below,
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Output formats supported by the CLI utility.
pub(crate) enum OutputFormat {
	Plain,
	Json,
}
