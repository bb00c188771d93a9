//! The select controller tying the engine components together.
//!
//! [`Select`] owns the option index, the filtered view, the menu state and
//! the selection of one control. Hosts feed it input and drain the
//! [`SelectEvent`]s and [`ViewRequest`]s it queues.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::config::SelectConfig;
use crate::error::SelectError;
use crate::events::{SelectEvent, ViewRequest};
use crate::focus::{Document, ElementId, FocusOutsideDetector, Interaction, Registration};
use crate::input::Key;
use crate::menu::{Direction, MenuState, MenuStateMachine};
use crate::option::{OptionIndex, OptionKey, OptionValue};
use crate::placement::{Placement, Positioner, Rect, Side};
use crate::search::{FilteredIndex, MatchMode, MatcherCallback, SearchMatcher, filter, label_of};
use crate::selection::{CommitOutcome, Selection, SelectionCoordinator};


static NEXT_HTML_ID: AtomicU64 = AtomicU64::new(0);

/// Headless combobox / listbox control.
pub struct Select {
	config: SelectConfig,
	raw_options: Vec<Value>,
	index: Arc<OptionIndex>,
	filtered: FilteredIndex,
	matcher: SearchMatcher,
	menu: MenuStateMachine,
	selection: SelectionCoordinator,
	detector: FocusOutsideDetector,
	registration: Option<Registration>,
	/// Set by the detector callback, consumed by [`Select::on_frame`].
	outside: Rc<Cell<bool>>,
	html_id: String,
	side: Side,
	placement: Option<Placement>,
	search_focused: bool,
	events: Vec<SelectEvent>,
	view_requests: Vec<ViewRequest>,
}

impl Select {
	/// Build a control registered with the thread's shared detector.
	pub fn new(config: SelectConfig, raw_options: Vec<Value>) -> Result<Self, SelectError> {
		Self::with_detector(config, raw_options, FocusOutsideDetector::shared())
	}

	/// Build a control registered with `detector`.
	pub fn with_detector(
		config: SelectConfig,
		raw_options: Vec<Value>,
		detector: FocusOutsideDetector,
	) -> Result<Self, SelectError> {
		config.validate()?;

		let index = Arc::new(OptionIndex::build(
			&raw_options,
			config.track_by_key.as_deref(),
		)?);
		let filtered = FilteredIndex::identity(Arc::clone(&index));
		let menu = MenuStateMachine::new(
			config.clear_search_string_on_blur,
			config.animate_transitions,
		);
		let selection = if config.multiple {
			SelectionCoordinator::multi(
				config.track_by_key.clone(),
				config.minimum_selections,
				config.maximum_selections,
			)
		} else {
			SelectionCoordinator::single(config.track_by_key.clone())
		};
		let html_id = config.html_id.clone().unwrap_or_else(|| {
			format!(
				"selectbox-{}",
				NEXT_HTML_ID.fetch_add(1, Ordering::Relaxed)
			)
		});

		let outside = Rc::new(Cell::new(false));
		let flag = Rc::clone(&outside);
		detector.activate();
		let registration = detector.register(Vec::new(), move || flag.set(true));

		let select = Self {
			matcher: SearchMatcher::Default(config.match_mode),
			config,
			raw_options,
			index,
			filtered,
			menu,
			selection,
			detector,
			registration: Some(registration),
			outside,
			html_id,
			side: Side::Below,
			placement: None,
			search_focused: false,
			events: Vec::new(),
			view_requests: Vec::new(),
		};
		select.sync_listening();
		Ok(select)
	}

	pub fn config(&self) -> &SelectConfig {
		&self.config
	}

	pub fn index(&self) -> &Arc<OptionIndex> {
		&self.index
	}

	/// Options that match the current search, in index order.
	pub fn filtered(&self) -> &FilteredIndex {
		&self.filtered
	}

	pub fn search(&self) -> &str {
		self.menu.search()
	}

	pub fn active_key(&self) -> Option<&OptionKey> {
		self.menu.active()
	}

	/// Whether the option list is visible. Always true in listbox mode.
	pub fn is_open(&self) -> bool {
		self.config.listbox || self.menu.is_open()
	}

	pub fn menu_state(&self) -> MenuState {
		self.menu.state()
	}

	pub fn selection(&self) -> &Selection {
		self.selection.selection()
	}

	pub fn selected_keys(&self) -> Vec<OptionKey> {
		self.selection.keys()
	}

	/// Whether fewer options are selected than `minimum_selections` asks for.
	pub fn below_minimum(&self) -> bool {
		self.selection.below_minimum()
	}

	pub fn is_search_focused(&self) -> bool {
		self.search_focused
	}

	pub fn side(&self) -> Side {
		self.side
	}

	pub fn placement(&self) -> Option<&Placement> {
		self.placement.as_ref()
	}

	pub fn html_id(&self) -> &str {
		&self.html_id
	}

	/// Drain queued consumer events.
	pub fn take_events(&mut self) -> Vec<SelectEvent> {
		std::mem::take(&mut self.events)
	}

	/// Drain queued rendering requests.
	pub fn take_view_requests(&mut self) -> Vec<ViewRequest> {
		std::mem::take(&mut self.view_requests)
	}

	// ---- options and search -------------------------------------------------

	/// Replace the raw options. On error the previous options stay in place.
	pub fn set_options(&mut self, raw_options: Vec<Value>) -> Result<(), SelectError> {
		let index = Arc::new(OptionIndex::build(
			&raw_options,
			self.config.track_by_key.as_deref(),
		)?);
		self.install_index(index)?;
		self.raw_options = raw_options;
		Ok(())
	}

	/// Change the tracking field and rebuild the index from the current raw
	/// options. On error nothing changes.
	pub fn set_track_by_key(&mut self, track_by_key: Option<String>) -> Result<(), SelectError> {
		let index = Arc::new(OptionIndex::build(
			&self.raw_options,
			track_by_key.as_deref(),
		)?);
		self.install_index(index)?;
		self.selection.set_track_by_key(track_by_key.clone());
		self.config.track_by_key = track_by_key;
		Ok(())
	}

	/// Replace the search string and refilter. On error the previous search
	/// and view stay in place.
	pub fn set_search(&mut self, search: impl Into<String>) -> Result<(), SelectError> {
		let search = search.into();
		let filtered = self.filter_with(&search, &self.matcher)?;
		self.menu.set_search(search);
		self.install_view(filtered);
		Ok(())
	}

	/// Empty the search string.
	pub fn clear_search(&mut self) {
		if self.menu.clear_search() {
			self.show_all();
		}
	}

	/// Filter with `callback` instead of the built-in matcher.
	pub fn set_search_handler(&mut self, callback: MatcherCallback) -> Result<(), SelectError> {
		self.install_matcher(SearchMatcher::Custom(callback))
	}

	/// Go back to the built-in matcher.
	pub fn clear_search_handler(&mut self) -> Result<(), SelectError> {
		self.install_matcher(SearchMatcher::Default(self.config.match_mode))
	}

	/// Switch the built-in matching rule. A custom handler stays in charge
	/// until it is cleared.
	pub fn set_match_mode(&mut self, mode: MatchMode) -> Result<(), SelectError> {
		if matches!(self.matcher, SearchMatcher::Default(_)) {
			self.install_matcher(SearchMatcher::Default(mode))?;
		}
		self.config.match_mode = mode;
		Ok(())
	}

	fn install_matcher(&mut self, matcher: SearchMatcher) -> Result<(), SelectError> {
		let filtered = self.filter_with(self.menu.search(), &matcher)?;
		self.matcher = matcher;
		self.install_view(filtered);
		Ok(())
	}

	/// Seed the selection from option keys without raising events.
	pub fn set_selection_keys(&mut self, keys: &[OptionKey]) -> Result<(), SelectError> {
		if !self.config.multiple && keys.len() > 1 {
			return Err(SelectError::InvalidConfig(
				"a single select accepts at most one selected key".into(),
			));
		}
		if self.config.maximum_selections > 0 && keys.len() > self.config.maximum_selections {
			return Err(SelectError::InvalidConfig(format!(
				"{} selected keys exceed maximum_selections ({})",
				keys.len(),
				self.config.maximum_selections
			)));
		}

		let mut entries = Vec::with_capacity(keys.len());
		for key in keys {
			let stored = self
				.index
				.resolve_key(key)
				.ok_or_else(|| SelectError::UnknownKey { key: key.clone() })?;
			let value = self.index.get(stored).cloned().unwrap_or(Value::Null);
			entries.push((stored.clone(), value));
		}

		self.selection.clear();
		for (key, value) in entries {
			if !self.selection.is_selected(&value) {
				self.selection.commit(key, value);
			}
		}
		Ok(())
	}

	fn install_index(&mut self, index: Arc<OptionIndex>) -> Result<(), SelectError> {
		let filtered = filter(
			&index,
			self.menu.search(),
			&self.matcher,
			&self.config.label_field,
		)?;
		self.index = index;
		self.menu.reconcile(&filtered);
		self.filtered = filtered;
		Ok(())
	}

	fn filter_with(
		&self,
		search: &str,
		matcher: &SearchMatcher,
	) -> Result<FilteredIndex, SelectError> {
		filter(&self.index, search, matcher, &self.config.label_field)
	}

	fn install_view(&mut self, filtered: FilteredIndex) {
		self.menu.reconcile(&filtered);
		self.filtered = filtered;
	}

	fn show_all(&mut self) {
		self.filtered = FilteredIndex::identity(Arc::clone(&self.index));
		self.menu.reconcile(&self.filtered);
	}

	// ---- menu ----------------------------------------------------------------

	/// Open the dropdown unless it is open or still animating.
	pub fn request_open(&mut self) -> bool {
		if self.config.listbox || !self.menu.request_open() {
			return false;
		}
		tracing::debug!(id = %self.html_id, "menu opened");
		self.events.push(SelectEvent::Open);
		self.sync_listening();
		true
	}

	/// Close the dropdown, forget the active option and, when configured,
	/// clear the search. Returns whether the dropdown was open.
	pub fn blur(&mut self) -> bool {
		let had_search = !self.menu.search().is_empty();
		let was_open = self.menu.close();
		if had_search && self.menu.search().is_empty() {
			self.show_all();
		}
		if was_open && !self.config.listbox {
			tracing::debug!(id = %self.html_id, "menu closed");
			self.events.push(SelectEvent::Close);
		}
		self.sync_listening();
		was_open
	}

	pub fn transition_started(&mut self, state: MenuState) {
		self.menu.transition_started(state);
	}

	/// The open or close animation finished; the menu may open again.
	pub fn transition_finished(&mut self) {
		self.menu.transition_finished();
	}

	/// Move the highlight and ask the renderer to scroll it into view.
	pub fn navigate(&mut self, direction: Direction) -> Option<OptionKey> {
		let key = self.menu.navigate(direction, &self.filtered)?;
		self.view_requests
			.push(ViewRequest::ScrollIntoView { key: key.clone() });
		Some(key)
	}

	/// Highlight `key` if it is visible.
	pub fn set_active(&mut self, key: &OptionKey) -> bool {
		match self.index.resolve_key(key).cloned() {
			Some(stored) => self.menu.set_active(&stored, &self.filtered),
			None => false,
		}
	}

	// ---- selection ---------------------------------------------------------

	/// Commit the active option. Returns `None` when nothing is active.
	pub fn commit(&mut self) -> Option<CommitOutcome> {
		let key = self.menu.active()?.clone();
		let value = self.filtered.get(&key)?.clone();
		Some(self.commit_entry(key, value))
	}

	/// Pointer pick of a rendered option.
	pub fn select_key(&mut self, key: &OptionKey) -> Option<CommitOutcome> {
		if !self.set_active(key) {
			return None;
		}
		self.commit()
	}

	fn commit_entry(&mut self, key: OptionKey, value: OptionValue) -> CommitOutcome {
		let outcome = self.selection.commit(key.clone(), value.clone());
		if !outcome.accepted {
			return outcome;
		}

		self.events.push(SelectEvent::Selected { key, value });
		self.push_selection_changed();

		if self.config.close_on_select && !self.config.listbox {
			self.blur();
		}
		outcome
	}

	/// Drop the whole selection.
	pub fn clear(&mut self) -> bool {
		let changed = self.selection.clear();
		self.events.push(SelectEvent::Clear);
		if changed {
			self.push_selection_changed();
		}
		changed
	}

	/// Whether the option keyed by `key` is selected.
	pub fn is_selected(&self, key: &OptionKey) -> bool {
		match self.index.resolve_key(key).and_then(|stored| self.index.get(stored)) {
			Some(value) => self.selection.is_selected(value),
			None => self.selection.entries().any(|(selected, _)| selected.matches(key)),
		}
	}

	fn push_selection_changed(&mut self) {
		self.events.push(SelectEvent::SelectionChanged {
			keys: self.selection.keys(),
			values: self.selection.values(),
		});
	}

	// ---- input -------------------------------------------------------------

	/// Handle a key press on the control. Returns `true` when the key was
	/// consumed and its default action should be suppressed.
	pub fn handle_key(&mut self, key: &Key) -> Result<bool, SelectError> {
		match key {
			Key::Char(ch) if key.is_printable() => {
				if self.search_focused {
					return Ok(false);
				}
				let mut search = self.menu.search().to_owned();
				search.push(*ch);
				let filtered = self.filter_with(&search, &self.matcher)?;

				self.request_open();
				self.menu.set_search(search);
				self.view_requests.push(ViewRequest::FocusSearch);
				self.install_view(filtered);
				Ok(true)
			}
			Key::ArrowDown => {
				self.request_open();
				self.navigate(Direction::Down);
				self.view_requests.push(ViewRequest::FocusSearch);
				Ok(true)
			}
			Key::ArrowUp => {
				self.navigate(Direction::Up);
				self.view_requests.push(ViewRequest::FocusSearch);
				Ok(true)
			}
			Key::ArrowLeft | Key::ArrowRight => {
				self.view_requests.push(ViewRequest::FocusSearch);
				Ok(false)
			}
			Key::Enter => {
				self.commit();
				Ok(true)
			}
			Key::Escape => Ok(self.blur()),
			_ => Ok(false),
		}
	}

	/// Pointer click on the control itself.
	pub fn handle_click(&mut self) {
		self.view_requests.push(ViewRequest::FocusSearch);
		if self.config.open_on_click {
			self.request_open();
		}
	}

	/// The window scrolled.
	pub fn handle_scroll(&mut self) -> bool {
		if self.config.close_on_scroll && self.menu.is_open() {
			return self.blur();
		}
		false
	}

	/// The search input gained or lost focus.
	pub fn set_search_focused(&mut self, focused: bool) {
		self.search_focused = focused;
	}

	// ---- outside detection -------------------------------------------------

	/// Elements that count as inside the control, typically the container
	/// and the dropdown.
	pub fn set_boundary<I>(&mut self, elements: I)
	where
		I: IntoIterator<Item = ElementId>,
	{
		if let Some(registration) = &self.registration {
			registration.set_boundary(elements);
		}
	}

	/// Forward a document-level interaction to the detector.
	pub fn dispatch(&self, interaction: Interaction) -> bool {
		self.detector.dispatch(interaction)
	}

	/// Run the deferred outside checks for this frame and close the menu if
	/// one of them landed outside. Returns whether the menu closed.
	pub fn on_frame(&mut self, document: &dyn Document) -> bool {
		self.detector.flush(document);
		if self.outside.replace(false) {
			let was_open = self.menu.is_open();
			self.blur();
			return was_open;
		}
		false
	}

	fn sync_listening(&self) {
		let Some(registration) = &self.registration else {
			return;
		};
		if self.is_open() {
			registration.listen();
		} else {
			registration.unlisten();
		}
	}

	// ---- presentation ------------------------------------------------------

	/// Ask `positioner` where the dropdown goes and remember the side.
	pub fn update_placement(&mut self, positioner: &mut dyn Positioner, anchor: Rect) -> Placement {
		let location = self.config.menu_location;
		let request = location.request(self.config.drop_down_max_height, anchor.width);
		let mut placement = positioner.place(anchor, &request);
		placement.side = location.resolve(placement.side);
		self.side = placement.side;
		self.placement = Some(placement);
		placement
	}

	/// CSS classes describing the control state.
	pub fn classes(&self) -> Vec<&'static str> {
		let mut classes = vec![
			if self.is_open() { "open" } else { "closed" },
			self.side.as_str(),
		];
		if self.config.listbox {
			classes.push("listbox");
		}
		classes
	}

	/// Element id of the rendered option for `key`.
	pub fn option_element_id(&self, key: &OptionKey) -> String {
		format!("{}-option-{key}", self.html_id)
	}

	/// Element id of the highlighted option, for `aria-activedescendant`.
	pub fn active_descendant_id(&self) -> Option<String> {
		self.menu.active().map(|key| self.option_element_id(key))
	}

	/// Label of the option for `key`, if it exists and carries one.
	pub fn label(&self, key: &OptionKey) -> Option<&str> {
		let stored = self.index.resolve_key(key)?;
		let value = self.index.get(stored)?;
		self.label_for(stored, value)
	}

	/// Text shown in the closed control: selected labels or the placeholder.
	pub fn display_label(&self) -> String {
		if self.selection.is_empty() {
			return self.config.placeholder.clone();
		}
		self.selection
			.entries()
			.map(|(key, value)| {
				self.label_for(key, value)
					.map(str::to_string)
					.unwrap_or_else(|| key.to_string())
			})
			.collect::<Vec<_>>()
			.join(", ")
	}

	fn label_for<'a>(&self, key: &OptionKey, value: &'a OptionValue) -> Option<&'a str> {
		let string_mode = self.index.track_by_key().is_none();
		label_of(key, value, &self.config.label_field, string_mode).ok()
	}
}

impl Drop for Select {
	fn drop(&mut self) {
		if let Some(registration) = self.registration.take() {
			registration.unregister();
		}
	}
}
