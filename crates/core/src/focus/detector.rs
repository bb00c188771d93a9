use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use super::document::{Document, ElementId};
use crate::input::Key;

type Callback = Box<dyn FnMut()>;

/// Identifier of a boundary registered with a [`FocusOutsideDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundaryId(u64);

/// A user interaction observed at the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
	/// Pointer press on `target`.
	PointerDown { target: Option<ElementId> },
	/// Key press anywhere in the document. Only `Tab` moves focus.
	KeyDown { key: Key },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingCheck {
	/// Pointer target captured when the event fired.
	Target(ElementId),
	/// Resolve the focused element once focus has settled.
	SettledFocus,
}

struct Boundary {
	id: BoundaryId,
	elements: Vec<ElementId>,
	/// `None` while the callback is running.
	callback: Option<Callback>,
	listening: bool,
}

#[derive(Default)]
struct DetectorState {
	active: bool,
	next_id: u64,
	boundaries: Vec<Boundary>,
	pending: VecDeque<PendingCheck>,
}

impl DetectorState {
	fn boundary_mut(&mut self, id: BoundaryId) -> Option<&mut Boundary> {
		self.boundaries.iter_mut().find(|boundary| boundary.id == id)
	}

	fn is_attached(&self) -> bool {
		self.active && self.boundaries.iter().any(|boundary| boundary.listening)
	}

	fn outside(&self, document: &dyn Document, target: Option<ElementId>) -> Vec<BoundaryId> {
		self.boundaries
			.iter()
			.filter(|boundary| boundary.listening)
			.filter(|boundary| {
				!boundary.elements.iter().any(|&element| {
					target.is_some_and(|target| document.contains(element, target))
				})
			})
			.map(|boundary| boundary.id)
			.collect()
	}
}

/// Reports interactions that land outside registered boundary sets.
///
/// One detector stands in for a single pointer/key listener pair on the
/// document root, shared by every registration. Interactions are queued by
/// [`dispatch`](Self::dispatch) and only evaluated by [`flush`](Self::flush),
/// which the host calls on the next frame once focus has settled.
#[derive(Clone, Default)]
pub struct FocusOutsideDetector {
	state: Rc<RefCell<DetectorState>>,
}

thread_local! {
	static SHARED: FocusOutsideDetector = FocusOutsideDetector::new();
}

impl FocusOutsideDetector {
	/// Create an inactive detector with no registrations.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Detector shared by every control on the current thread.
	#[must_use]
	pub fn shared() -> Self {
		SHARED.with(Clone::clone)
	}

	/// Register a boundary set. An empty set is always "outside".
	///
	/// The registration starts out listening.
	pub fn register<I, F>(&self, boundary: I, callback: F) -> Registration
	where
		I: IntoIterator<Item = ElementId>,
		F: FnMut() + 'static,
	{
		let mut state = self.state.borrow_mut();
		let id = BoundaryId(state.next_id);
		state.next_id += 1;
		state.boundaries.push(Boundary {
			id,
			elements: boundary.into_iter().collect(),
			callback: Some(Box::new(callback)),
			listening: true,
		});
		tracing::trace!(boundary = id.0, "registered focus boundary");

		Registration {
			id,
			state: Rc::downgrade(&self.state),
		}
	}

	/// Start listening globally. Calling it again has no effect.
	pub fn activate(&self) {
		self.state.borrow_mut().active = true;
	}

	/// Stop listening globally. Checks already queued still run on the next
	/// flush.
	pub fn deactivate(&self) {
		self.state.borrow_mut().active = false;
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		self.state.borrow().active
	}

	/// Whether the shared listener pair is currently attached: the detector
	/// is active and at least one registration listens.
	#[must_use]
	pub fn is_attached(&self) -> bool {
		self.state.borrow().is_attached()
	}

	/// Number of registrations, listening or not.
	#[must_use]
	pub fn len(&self) -> usize {
		self.state.borrow().boundaries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of checks waiting for the next flush.
	#[must_use]
	pub fn pending(&self) -> usize {
		self.state.borrow().pending.len()
	}

	/// Observe an interaction. Returns `true` when a check was queued.
	pub fn dispatch(&self, interaction: Interaction) -> bool {
		let mut state = self.state.borrow_mut();
		if !state.is_attached() {
			return false;
		}

		let check = match interaction {
			Interaction::PointerDown {
				target: Some(target),
			} => PendingCheck::Target(target),
			Interaction::PointerDown { target: None } => return false,
			Interaction::KeyDown { key: Key::Tab } => PendingCheck::SettledFocus,
			Interaction::KeyDown { .. } => return false,
		};
		state.pending.push_back(check);
		true
	}

	/// Evaluate the checks queued before this call.
	///
	/// Every listening registration whose boundary does not contain the
	/// interaction target has its callback invoked once per check. Returns
	/// the boundaries that fired, in order. Callbacks may register,
	/// unregister or dispatch; checks they queue wait for the next flush.
	pub fn flush(&self, document: &dyn Document) -> Vec<BoundaryId> {
		let checks = std::mem::take(&mut self.state.borrow_mut().pending);
		let mut fired = Vec::new();

		for check in checks {
			let target = match check {
				PendingCheck::Target(target) => Some(target),
				PendingCheck::SettledFocus => document.active_element(),
			};
			let outside = self.state.borrow().outside(document, target);

			for id in outside {
				let callback = self
					.state
					.borrow_mut()
					.boundary_mut(id)
					.and_then(|boundary| boundary.callback.take());
				let Some(mut callback) = callback else {
					continue;
				};

				callback();
				fired.push(id);

				if let Some(boundary) = self.state.borrow_mut().boundary_mut(id) {
					boundary.callback.get_or_insert(callback);
				}
			}
		}

		if !fired.is_empty() {
			tracing::trace!(fired = fired.len(), "focus moved outside boundaries");
		}
		fired
	}
}

/// Handle to a single boundary registration.
#[derive(Debug)]
pub struct Registration {
	id: BoundaryId,
	state: Weak<RefCell<DetectorState>>,
}

impl Registration {
	#[must_use]
	pub fn id(&self) -> BoundaryId {
		self.id
	}

	/// Remove this registration. Other registrations are unaffected.
	pub fn unregister(self) -> bool {
		let Some(state) = self.state.upgrade() else {
			return false;
		};
		let mut state = state.borrow_mut();
		let before = state.boundaries.len();
		state.boundaries.retain(|boundary| boundary.id != self.id);
		before != state.boundaries.len()
	}

	/// Resume receiving outside notifications.
	pub fn listen(&self) {
		self.set_listening(true);
	}

	/// Pause outside notifications without unregistering.
	pub fn unlisten(&self) {
		self.set_listening(false);
	}

	#[must_use]
	pub fn is_listening(&self) -> bool {
		self.state.upgrade().is_some_and(|state| {
			state
				.borrow()
				.boundaries
				.iter()
				.any(|boundary| boundary.id == self.id && boundary.listening)
		})
	}

	/// Replace the elements considered inside this boundary.
	pub fn set_boundary<I>(&self, boundary: I)
	where
		I: IntoIterator<Item = ElementId>,
	{
		let Some(state) = self.state.upgrade() else {
			return;
		};
		if let Some(entry) = state.borrow_mut().boundary_mut(self.id) {
			entry.elements = boundary.into_iter().collect();
		};
	}

	fn set_listening(&self, listening: bool) {
		let Some(state) = self.state.upgrade() else {
			return;
		};
		if let Some(entry) = state.borrow_mut().boundary_mut(self.id) {
			entry.listening = listening;
		};
	}
}
