//! Tracing setup for the `selectbox` driver.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "SELECTBOX_LOG";

/// Build the filter used when no directive is supplied.
fn default_filter(verbose: bool) -> EnvFilter {
	if verbose {
		EnvFilter::new("selectbox=debug,selectbox_core=debug,warn")
	} else {
		EnvFilter::new("warn")
	}
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for the transcript.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn initialize(verbose: bool) {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter(verbose));

	let layer = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(true);

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(layer)
		.try_init();
}
