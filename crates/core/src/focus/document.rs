use std::collections::HashMap;

/// Opaque handle to an element owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// The parts of a host document the focus-outside detector needs.
pub trait Document {
	/// Returns `true` when `node` is `ancestor` or one of its descendants.
	fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

	/// Element that currently holds focus, if any.
	fn active_element(&self) -> Option<ElementId>;
}

/// Minimal parent-pointer document for hosts without a real element tree.
#[derive(Debug, Default, Clone)]
pub struct TreeDocument {
	parents: HashMap<ElementId, Option<ElementId>>,
	next_id: u64,
	focused: Option<ElementId>,
}

impl TreeDocument {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a new element under `parent` (or as a root).
	pub fn insert(&mut self, parent: Option<ElementId>) -> ElementId {
		let id = ElementId(self.next_id);
		self.next_id += 1;
		self.parents.insert(id, parent);
		id
	}

	/// Move focus to `element`, or clear it.
	pub fn focus(&mut self, element: Option<ElementId>) {
		self.focused = element;
	}

	#[must_use]
	pub fn parent(&self, element: ElementId) -> Option<ElementId> {
		self.parents.get(&element).copied().flatten()
	}
}

impl Document for TreeDocument {
	fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
		let mut current = Some(node);
		while let Some(element) = current {
			if element == ancestor {
				return true;
			}
			current = self.parent(element);
		}
		false
	}

	fn active_element(&self) -> Option<ElementId> {
		self.focused
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn containment_is_inclusive_and_follows_parents() {
		let mut doc = TreeDocument::new();
		let root = doc.insert(None);
		let panel = doc.insert(Some(root));
		let button = doc.insert(Some(panel));
		let other = doc.insert(Some(root));

		assert!(doc.contains(panel, panel));
		assert!(doc.contains(panel, button));
		assert!(doc.contains(root, button));
		assert!(!doc.contains(panel, other));
		assert!(!doc.contains(button, panel));
	}
}
