//! End-to-end runs of scripted sessions and the `selectbox` binary.

use std::io::Write;
use std::process::Command;

use selectbox::script::{ScriptError, Session, parse_script};
use selectbox::{OptionKey, SelectConfig, SelectError};
use selectbox_core::Rect;
use serde_json::{Value, json};

fn colours() -> Vec<Value> {
	vec![json!("Blue"), json!("Red"), json!("Green")]
}

fn people() -> Vec<Value> {
	vec![
		json!({"id": 1, "name": "Ada"}),
		json!({"id": 2, "name": "Grace"}),
		json!({"id": 3, "name": "Linus"}),
	]
}

fn still() -> SelectConfig {
	SelectConfig {
		animate_transitions: false,
		..SelectConfig::default()
	}
}

fn run(config: SelectConfig, options: Vec<Value>, script: &str) -> Session {
	let mut session = Session::new(config, options, &[]).expect("session");
	let steps = parse_script(script).expect("script");
	session.run(&steps).expect("run");
	session
}

#[test]
fn typing_filters_then_enter_selects() {
	let session = run(still(), colours(), "type re\nkey ArrowDown\nkey Enter");
	let transcript = session.into_transcript();

	let state = &transcript.state;
	assert!(!state.open);
	assert_eq!(state.selected, vec![OptionKey::from("1")]);
	assert_eq!(state.label, "Red");

	let enter = &transcript.steps[2];
	assert_eq!(
		enter.events,
		vec![
			json!({"event": "selected", "key": "1", "value": {"value": "Red"}}),
			json!({"event": "selection-changed", "keys": ["1"], "values": [{"value": "Red"}]}),
			json!({"event": "close"}),
		]
	);
}

#[test]
fn outside_click_closes_after_the_frame() {
	let mut session = run(still(), colours(), "open\nclick outside");
	assert!(session.select().is_open());

	let steps = parse_script("frame").expect("script");
	session.run(&steps).expect("frame");
	assert!(!session.select().is_open());
	assert_eq!(
		session.records().last().map(|record| record.events.clone()),
		Some(vec![json!({"event": "close"})])
	);
}

#[test]
fn clicks_inside_the_control_or_menu_keep_it_open() {
	let session = run(
		still(),
		colours(),
		"open\nclick search\nframe\nclick menu\nframe",
	);
	assert!(session.select().is_open());
}

#[test]
fn tabbing_away_closes_but_tabbing_into_search_does_not() {
	let session = run(still(), colours(), "open\ntab search\nframe");
	assert!(session.select().is_open());

	let session = run(still(), colours(), "open\ntab outside\nframe");
	assert!(!session.select().is_open());
}

#[test]
fn multi_select_with_maximum() {
	let config = SelectConfig {
		multiple: true,
		maximum_selections: 2,
		close_on_select: false,
		track_by_key: Some("id".into()),
		label_field: "name".into(),
		..still()
	};
	let session = run(config, people(), "open\npick 1\npick 2\npick 3");
	let transcript = session.into_transcript();

	assert_eq!(
		transcript.state.selected,
		vec![OptionKey::Int(1), OptionKey::Int(2)]
	);
	assert!(transcript.steps[3].events.is_empty());
	assert!(transcript.state.open);
	assert_eq!(transcript.state.label, "Ada, Grace");
}

#[test]
fn listbox_never_emits_open_or_close() {
	let config = SelectConfig {
		listbox: true,
		..still()
	};
	let session = run(config, colours(), "key ArrowDown\nkey Enter\nclick outside\nframe");
	let transcript = session.into_transcript();

	let names: Vec<_> = transcript
		.steps
		.iter()
		.flat_map(|record| record.events.iter())
		.filter_map(|event| event["event"].as_str())
		.collect();
	assert_eq!(names, vec!["selected", "selection-changed"]);
	assert!(transcript.state.open);
	assert!(transcript.state.classes.contains(&"listbox"));
}

#[test]
fn animated_menu_reopens_only_after_settling() {
	let session = run(SelectConfig::default(), colours(), "open\nsettle\nclose\nopen");
	assert!(!session.select().is_open());

	let session = run(SelectConfig::default(), colours(), "open\nsettle\nclose\nsettle\nopen");
	assert!(session.select().is_open());
}

#[test]
fn placement_flips_near_the_viewport_bottom() {
	let mut session = Session::new(still(), colours(), &[]).expect("session");
	let anchor = Rect {
		x: 0.0,
		y: 560.0,
		width: 200.0,
		height: 32.0,
	};
	session.set_layout(anchor, 600.0);
	let steps = parse_script("open\nframe").expect("script");
	session.run(&steps).expect("run");
	assert!(session.final_state().classes.contains(&"above"));
}

#[test]
fn seeded_selection_and_unknown_pick() {
	let config = SelectConfig {
		track_by_key: Some("id".into()),
		label_field: "name".into(),
		..still()
	};
	let mut session = Session::new(config, people(), &[OptionKey::from("2")]).expect("session");
	assert_eq!(session.final_state().label, "Grace");

	let steps = parse_script("pick 9").expect("script");
	let err = session.run(&steps).expect_err("unknown option");
	assert_eq!(
		err,
		ScriptError::Step {
			step: "pick 9".into(),
			source: SelectError::UnknownKey {
				key: OptionKey::Int(9)
			},
		}
	);
}

#[test]
fn binary_prints_a_json_transcript() {
	let mut options = tempfile::NamedTempFile::new().expect("options file");
	write!(options, r#"["Blue", "Red", "Green"]"#).expect("write options");

	let output = Command::new(env!("CARGO_BIN_EXE_selectbox"))
		.args(["--no-config", "--output", "json", "--options"])
		.arg(options.path())
		.args(["--step", "type gr", "--step", "key Enter"])
		.env_remove("SELECTBOX_CONFIG")
		.output()
		.expect("run selectbox");
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

	let transcript: Value = serde_json::from_slice(&output.stdout).expect("json transcript");
	assert_eq!(transcript["state"]["visible"], json!(["2"]));
	assert_eq!(transcript["state"]["active"], Value::Null);
	assert_eq!(transcript["state"]["selected"], json!([]));
}
