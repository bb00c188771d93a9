//! Interface to the external positioning service.

use serde::{Deserialize, Serialize};

/// Gap between the control and its dropdown, in pixels.
pub const MENU_OFFSET_PX: f32 = 5.0;

/// Where the dropdown should appear relative to the control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuLocation {
	/// Below, flipping above when there is no room.
	#[default]
	Auto,
	Above,
	Below,
}

/// Side the dropdown ended up on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
	Above,
	#[default]
	Below,
}

impl Side {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Above => "above",
			Self::Below => "below",
		}
	}
}

/// Anchor rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
	pub x: f32,
	pub y: f32,
	pub width: f32,
	pub height: f32,
}

/// What the control asks of the positioning service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
	pub max_height: u32,
	pub offset_px: f32,
	pub preferred_side: Side,
	pub anchor_width: f32,
	/// Whether the service may flip to the other side on overflow.
	pub allow_flip: bool,
}

/// What the positioning service resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
	pub side: Side,
	pub max_height: u32,
	pub width: f32,
}

/// Floating panel positioning, implemented by the host.
pub trait Positioner {
	fn place(&mut self, anchor: Rect, request: &PlacementRequest) -> Placement;
}

impl MenuLocation {
	/// Build the request for an anchor of `anchor_width` pixels.
	#[must_use]
	pub fn request(self, max_height: u32, anchor_width: f32) -> PlacementRequest {
		let (preferred_side, allow_flip) = match self {
			Self::Auto => (Side::Below, true),
			Self::Above => (Side::Above, false),
			Self::Below => (Side::Below, false),
		};
		PlacementRequest {
			max_height,
			offset_px: MENU_OFFSET_PX,
			preferred_side,
			anchor_width,
			allow_flip,
		}
	}

	/// Side to use given what the positioner resolved. Forced locations win.
	#[must_use]
	pub fn resolve(self, resolved: Side) -> Side {
		match self {
			Self::Auto => resolved,
			Self::Above => Side::Above,
			Self::Below => Side::Below,
		}
	}
}
