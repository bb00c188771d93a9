//! Detection of pointer and focus activity outside registered boundaries.

mod detector;
mod document;

pub use detector::{BoundaryId, FocusOutsideDetector, Interaction, Registration};
pub use document::{Document, ElementId, TreeDocument};
