use serde::Serialize;
use serde_json::{Value, json};

use selectbox_core::{
	FocusOutsideDetector, Interaction, Key, OptionKey, Rect, Select, SelectConfig, SelectError,
	SelectEvent, ViewRequest,
};

use super::ScriptError;
use super::document::{HeadlessDocument, ViewportPositioner};
use super::step::{Element, Step};

/// Everything a step produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
	pub step: String,
	pub events: Vec<Value>,
	pub view_requests: Vec<Value>,
}

/// Snapshot of the control after the last step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalState {
	pub open: bool,
	pub menu_state: &'static str,
	pub search: String,
	pub active: Option<OptionKey>,
	pub active_descendant: Option<String>,
	pub visible: Vec<OptionKey>,
	pub selected: Vec<OptionKey>,
	pub below_minimum: bool,
	pub classes: Vec<&'static str>,
	pub side: &'static str,
	pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
	pub steps: Vec<StepRecord>,
	pub state: FinalState,
}

/// A control mounted in a [`HeadlessDocument`], driven one step at a time.
///
/// The session plays the host: it forwards document-level interactions to
/// the focus detector, honours focus requests and runs placement on every
/// frame.
pub struct Session {
	select: Select,
	document: HeadlessDocument,
	positioner: ViewportPositioner,
	anchor: Rect,
	records: Vec<StepRecord>,
}

impl Session {
	/// Mount a control with `options`, seeded with the `selected` keys.
	pub fn new(
		config: SelectConfig,
		options: Vec<Value>,
		selected: &[OptionKey],
	) -> Result<Self, SelectError> {
		let mut select = Select::with_detector(config, options, FocusOutsideDetector::new())?;
		select.set_selection_keys(selected)?;

		let document = HeadlessDocument::new();
		select.set_boundary(document.boundary());

		Ok(Self {
			select,
			document,
			positioner: ViewportPositioner::default(),
			anchor: Rect {
				x: 16.0,
				y: 48.0,
				width: 240.0,
				height: 32.0,
			},
			records: Vec::new(),
		})
	}

	/// Move the control within the viewport.
	pub fn set_layout(&mut self, anchor: Rect, viewport_height: f32) {
		self.anchor = anchor;
		self.positioner.viewport_height = viewport_height;
	}

	pub fn select(&self) -> &Select {
		&self.select
	}

	pub fn records(&self) -> &[StepRecord] {
		&self.records
	}

	/// Apply every step in order, stopping at the first failure.
	pub fn run<'a, I>(&mut self, steps: I) -> Result<(), ScriptError>
	where
		I: IntoIterator<Item = &'a Step>,
	{
		for step in steps {
			self.apply(step).map_err(|source| ScriptError::Step {
				step: step.to_string(),
				source,
			})?;
		}
		Ok(())
	}

	/// Apply one step and record what it produced.
	pub fn apply(&mut self, step: &Step) -> Result<&StepRecord, SelectError> {
		tracing::debug!(%step, "applying step");
		self.perform(step)?;

		let view_requests = self.select.take_view_requests();
		for request in &view_requests {
			if *request == ViewRequest::FocusSearch {
				self.move_focus(Some(Element::Search));
			}
		}

		self.records.push(StepRecord {
			step: step.to_string(),
			events: self.select.take_events().iter().map(event_json).collect(),
			view_requests: view_requests.iter().map(request_json).collect(),
		});
		Ok(&self.records[self.records.len() - 1])
	}

	fn perform(&mut self, step: &Step) -> Result<(), SelectError> {
		match step {
			Step::Type(text) => {
				for ch in text.chars() {
					if self.select.is_search_focused() {
						let search = format!("{}{ch}", self.select.search());
						self.select.set_search(search)?;
					} else {
						self.select.handle_key(&Key::Char(ch))?;
					}
				}
			}
			Step::Key(key) => {
				self.select.dispatch(Interaction::KeyDown { key: key.clone() });
				self.select.handle_key(key)?;
			}
			Step::Search(text) => self.select.set_search(text.as_str())?,
			Step::FocusSearch => self.move_focus(Some(Element::Search)),
			Step::BlurSearch => self.move_focus(None),
			Step::Click(element) => {
				self.press(*element);
				if matches!(element, Element::Container | Element::Search) {
					self.select.handle_click();
				}
			}
			Step::Tab(element) => {
				self.select.dispatch(Interaction::KeyDown { key: Key::Tab });
				self.move_focus(Some(*element));
			}
			Step::Pick(key) => {
				self.press(Element::Menu);
				if self.select.select_key(key).is_none() {
					return Err(SelectError::UnknownKey { key: key.clone() });
				}
			}
			Step::Frame => {
				self.select.on_frame(&self.document);
				if self.select.is_open() {
					self.select.update_placement(&mut self.positioner, self.anchor);
				}
			}
			Step::Settle => self.select.transition_finished(),
			Step::Scroll => {
				self.select.handle_scroll();
			}
			Step::Clear => {
				self.select.clear();
			}
			Step::Commit => {
				self.select.commit();
			}
			Step::Open => {
				self.select.request_open();
			}
			Step::Close => {
				self.select.blur();
			}
		}
		Ok(())
	}

	fn press(&self, element: Element) {
		self.select.dispatch(Interaction::PointerDown {
			target: Some(self.document.element(element)),
		});
	}

	fn move_focus(&mut self, element: Option<Element>) {
		self.document.focus(element);
		self.select
			.set_search_focused(element == Some(Element::Search));
	}

	pub fn final_state(&self) -> FinalState {
		let select = &self.select;
		FinalState {
			open: select.is_open(),
			menu_state: select.menu_state().as_str(),
			search: select.search().to_string(),
			active: select.active_key().cloned(),
			active_descendant: select.active_descendant_id(),
			visible: select.filtered().keys().cloned().collect(),
			selected: select.selected_keys(),
			below_minimum: select.below_minimum(),
			classes: select.classes(),
			side: select.side().as_str(),
			label: select.display_label(),
		}
	}

	/// Consume the session into its transcript.
	pub fn into_transcript(self) -> Transcript {
		let state = self.final_state();
		Transcript {
			steps: self.records,
			state,
		}
	}
}

/// JSON form of an event as consumers see it.
pub fn event_json(event: &SelectEvent) -> Value {
	match event {
		SelectEvent::Open | SelectEvent::Close | SelectEvent::Clear => {
			json!({ "event": event.name() })
		}
		SelectEvent::Selected { key, value } => json!({
			"event": event.name(),
			"key": key,
			"value": value,
		}),
		SelectEvent::SelectionChanged { keys, values } => json!({
			"event": event.name(),
			"keys": keys,
			"values": values,
		}),
	}
}

fn request_json(request: &ViewRequest) -> Value {
	match request {
		ViewRequest::ScrollIntoView { key } => json!({
			"request": "scroll-into-view",
			"key": key,
		}),
		ViewRequest::FocusSearch => json!({ "request": "focus-search" }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::script::parse_script;

	fn colours() -> Vec<Value> {
		vec![json!("Blue"), json!("Red"), json!("Green")]
	}

	fn still() -> SelectConfig {
		SelectConfig {
			animate_transitions: false,
			..SelectConfig::default()
		}
	}

	#[test]
	fn focus_requests_move_focus_to_the_search_input() {
		let mut session = Session::new(still(), colours(), &[]).expect("session");
		session.apply(&Step::Type("r".into())).expect("type");
		assert!(session.select().is_search_focused());

		session.apply(&Step::Type("e".into())).expect("type");
		assert_eq!(session.select().search(), "re");
		assert!(session.records()[1].events.is_empty());
	}

	#[test]
	fn pick_of_hidden_option_fails() {
		let mut session = Session::new(still(), colours(), &[]).expect("session");
		let steps = parse_script("type gr\npick 0").expect("script");
		let err = session.run(&steps).expect_err("blue is filtered out");
		assert!(matches!(err, ScriptError::Step { ref step, .. } if step == "pick 0"));
	}

	#[test]
	fn events_serialize_with_their_names() {
		let event = SelectEvent::Selected {
			key: OptionKey::Int(4),
			value: json!({"id": 4}),
		};
		assert_eq!(
			event_json(&event),
			json!({"event": "selected", "key": 4, "value": {"id": 4}})
		);
	}
}
