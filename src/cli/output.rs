use anyhow::Result;
use selectbox::script::Transcript;
use serde_json::Value;

/// Render a JSON value compactly for the plain transcript.
fn inline(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

/// Format the transcript as indented text.
pub(crate) fn format_plain(transcript: &Transcript) -> String {
	let mut lines = Vec::new();

	for record in &transcript.steps {
		lines.push(format!("> {}", record.step));
		for event in &record.events {
			let name = event.get("event").map(inline).unwrap_or_default();
			let mut detail = String::new();
			if let Some(key) = event.get("key") {
				detail = format!(" {}", inline(key));
			} else if let Some(keys) = event.get("keys") {
				detail = format!(" {}", inline(keys));
			}
			lines.push(format!("  event {name}{detail}"));
		}
		for request in &record.view_requests {
			let name = request.get("request").map(inline).unwrap_or_default();
			let key = request
				.get("key")
				.map(|key| format!(" {}", inline(key)))
				.unwrap_or_default();
			lines.push(format!("  view {name}{key}"));
		}
	}

	let state = &transcript.state;
	let keys = |keys: &[selectbox::OptionKey]| {
		keys.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(", ")
	};

	lines.push(format!(
		"open: {} ({})",
		state.open, state.menu_state
	));
	lines.push(format!("search: '{}'", state.search));
	lines.push(format!(
		"active: {}",
		state
			.active
			.as_ref()
			.map(ToString::to_string)
			.unwrap_or_else(|| "(none)".into())
	));
	lines.push(format!("visible: [{}]", keys(&state.visible)));
	lines.push(format!("selected: [{}]", keys(&state.selected)));
	if state.below_minimum {
		lines.push("selected: below minimum".into());
	}
	lines.push(format!("classes: {}", state.classes.join(" ")));
	lines.push(format!("label: {}", state.label));

	lines.join("\n")
}

/// Print the plain-text transcript.
pub(crate) fn print_plain(transcript: &Transcript) {
	println!("{}", format_plain(transcript));
}

/// Format the transcript as a JSON string.
pub(crate) fn format_transcript_json(transcript: &Transcript) -> Result<String> {
	Ok(serde_json::to_string_pretty(transcript)?)
}

/// Print the JSON transcript.
pub(crate) fn print_json(transcript: &Transcript) -> Result<()> {
	println!("{}", format_transcript_json(transcript)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use selectbox::SelectConfig;
	use selectbox::script::{Session, parse_script};
	use serde_json::json;

	use super::*;

	fn transcript() -> Transcript {
		let config = SelectConfig {
			animate_transitions: false,
			..SelectConfig::default()
		};
		let mut session = Session::new(
			config,
			vec![json!("Blue"), json!("Red"), json!("Green")],
			&[],
		)
		.expect("session");
		let steps = parse_script("type re\nkey ArrowDown\nkey Enter").expect("script");
		session.run(&steps).expect("run");
		session.into_transcript()
	}

	#[test]
	fn plain_output_lists_steps_and_state() {
		let text = format_plain(&transcript());
		assert!(text.contains("> type re\n  event open\n  view focus-search"));
		assert!(text.contains("  event selected 1"));
		assert!(text.contains("selected: [1]"));
		assert!(text.contains("label: Red"));
	}

	#[test]
	fn json_output_carries_final_state() {
		let json = format_transcript_json(&transcript()).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["state"]["selected"], json!(["1"]));
		assert_eq!(value["state"]["open"], json!(false));
		assert_eq!(value["steps"][2]["events"][0]["event"], "selected");
	}
}
