use selectbox_core::{
	Document, ElementId, Placement, PlacementRequest, Positioner, Rect, Side, TreeDocument,
};

use super::step::Element;

/// Page with one control: the container holds the search input, the menu is
/// mounted at the root like a floating panel, and one unrelated element
/// stands in for the rest of the page.
#[derive(Debug, Clone)]
pub struct HeadlessDocument {
	tree: TreeDocument,
	container: ElementId,
	search: ElementId,
	menu: ElementId,
	outside: ElementId,
}

impl Default for HeadlessDocument {
	fn default() -> Self {
		Self::new()
	}
}

impl HeadlessDocument {
	pub fn new() -> Self {
		let mut tree = TreeDocument::new();
		let container = tree.insert(None);
		let search = tree.insert(Some(container));
		let menu = tree.insert(None);
		let outside = tree.insert(None);
		Self {
			tree,
			container,
			search,
			menu,
			outside,
		}
	}

	pub fn element(&self, element: Element) -> ElementId {
		match element {
			Element::Container => self.container,
			Element::Search => self.search,
			Element::Menu => self.menu,
			Element::Outside => self.outside,
		}
	}

	/// Elements that count as inside the control.
	pub fn boundary(&self) -> [ElementId; 2] {
		[self.container, self.menu]
	}

	pub fn focus(&mut self, element: Option<Element>) {
		let id = element.map(|element| self.element(element));
		self.tree.focus(id);
	}
}

impl Document for HeadlessDocument {
	fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
		self.tree.contains(ancestor, node)
	}

	fn active_element(&self) -> Option<ElementId> {
		self.tree.active_element()
	}
}

/// Positions the dropdown inside a fixed-height viewport, flipping above the
/// anchor when there is more room there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPositioner {
	pub viewport_height: f32,
}

impl Default for ViewportPositioner {
	fn default() -> Self {
		Self {
			viewport_height: 720.0,
		}
	}
}

impl Positioner for ViewportPositioner {
	fn place(&mut self, anchor: Rect, request: &PlacementRequest) -> Placement {
		let below = self.viewport_height - (anchor.y + anchor.height) - request.offset_px;
		let above = anchor.y - request.offset_px;
		let wanted = request.max_height as f32;

		let side = match request.preferred_side {
			Side::Below if request.allow_flip && below < wanted && above > below => Side::Above,
			Side::Above if request.allow_flip && above < wanted && below > above => Side::Below,
			preferred => preferred,
		};
		let room = match side {
			Side::Above => above,
			Side::Below => below,
		};

		Placement {
			side,
			max_height: wanted.min(room.max(0.0)) as u32,
			width: request.anchor_width,
		}
	}
}

#[cfg(test)]
mod tests {
	use selectbox_core::MenuLocation;

	use super::*;

	#[test]
	fn search_sits_inside_the_container_but_menu_does_not() {
		let document = HeadlessDocument::new();
		let container = document.element(Element::Container);
		assert!(document.contains(container, document.element(Element::Search)));
		assert!(!document.contains(container, document.element(Element::Menu)));
		assert!(!document.contains(container, document.element(Element::Outside)));
	}

	#[test]
	fn flips_above_near_the_bottom_edge() {
		let mut positioner = ViewportPositioner {
			viewport_height: 600.0,
		};
		let anchor = Rect {
			x: 0.0,
			y: 500.0,
			width: 200.0,
			height: 40.0,
		};

		let placement = positioner.place(anchor, &MenuLocation::Auto.request(300, anchor.width));
		assert_eq!(placement.side, Side::Above);
		assert_eq!(placement.max_height, 300);
		assert_eq!(placement.width, 200.0);

		let forced = positioner.place(anchor, &MenuLocation::Below.request(300, anchor.width));
		assert_eq!(forced.side, Side::Below);
		assert_eq!(forced.max_height, 55);
	}
}
