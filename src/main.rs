mod cli;
mod settings;

use anyhow::{Context, Result};
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use selectbox::logging;
use selectbox::script::Session;
use settings::ResolvedSettings;

fn main() -> Result<()> {
	let cli = parse_cli();
	logging::initialize(cli.verbose);

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	run_session(cli.output, resolved)
}

/// Replay the configured steps and print the transcript in the chosen format.
fn run_session(format: OutputFormat, settings: ResolvedSettings) -> Result<()> {
	let mut session = Session::new(settings.select, settings.options, &settings.selected)
		.context("failed to mount the select control")?;
	session.run(&settings.steps)?;
	let transcript = session.into_transcript();

	match format {
		OutputFormat::Plain => print_plain(&transcript),
		OutputFormat::Json => print_json(&transcript)?,
	}

	Ok(())
}
