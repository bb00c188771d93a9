use std::sync::Arc;

use super::matcher::{SearchMatcher, label_of};
use crate::error::SelectError;
use crate::option::{OptionIndex, OptionKey, OptionValue};

/// Ordered subset of an [`OptionIndex`] that satisfied the current search.
///
/// An empty search yields the identity view, which shares the index rather
/// than copying its entries.
#[derive(Debug, Clone)]
pub struct FilteredIndex {
	index: Arc<OptionIndex>,
	positions: Option<Vec<usize>>,
}

impl FilteredIndex {
	/// View containing every entry of `index`.
	#[must_use]
	pub fn identity(index: Arc<OptionIndex>) -> Self {
		Self {
			index,
			positions: None,
		}
	}

	/// Returns `true` when no filtering was applied.
	#[must_use]
	pub fn is_identity(&self) -> bool {
		self.positions.is_none()
	}

	/// Index this view was derived from.
	#[must_use]
	pub fn source(&self) -> &Arc<OptionIndex> {
		&self.index
	}

	#[must_use]
	pub fn len(&self) -> usize {
		match &self.positions {
			Some(positions) => positions.len(),
			None => self.index.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Entry at `position` within the filtered order.
	#[must_use]
	pub fn get_index(&self, position: usize) -> Option<(&OptionKey, &OptionValue)> {
		match &self.positions {
			Some(positions) => self.index.get_index(*positions.get(position)?),
			None => self.index.get_index(position),
		}
	}

	/// Position of `key` within the filtered order.
	#[must_use]
	pub fn position_of(&self, key: &OptionKey) -> Option<usize> {
		let source_position = self.index.position_of(key)?;
		match &self.positions {
			Some(positions) => positions.binary_search(&source_position).ok(),
			None => Some(source_position),
		}
	}

	#[must_use]
	pub fn contains_key(&self, key: &OptionKey) -> bool {
		self.position_of(key).is_some()
	}

	#[must_use]
	pub fn get(&self, key: &OptionKey) -> Option<&OptionValue> {
		self.position_of(key)?;
		self.index.get(key)
	}

	#[must_use]
	pub fn first_key(&self) -> Option<&OptionKey> {
		self.get_index(0).map(|(key, _)| key)
	}

	#[must_use]
	pub fn last_key(&self) -> Option<&OptionKey> {
		let last = self.len().checked_sub(1)?;
		self.get_index(last).map(|(key, _)| key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &OptionValue)> {
		(0..self.len()).filter_map(move |position| self.get_index(position))
	}

	pub fn keys(&self) -> impl Iterator<Item = &OptionKey> {
		self.iter().map(|(key, _)| key)
	}
}

/// Derive the filtered view of `index` for `search`.
///
/// A blank search returns the identity view without consulting the matcher.
/// Custom matchers see the raw search string and are called once per option
/// in index order; the built-in matcher trims and lower-cases it first.
pub fn filter(
	index: &Arc<OptionIndex>,
	search: &str,
	matcher: &SearchMatcher,
	label_field: &str,
) -> Result<FilteredIndex, SelectError> {
	if search.trim().is_empty() {
		return Ok(FilteredIndex::identity(Arc::clone(index)));
	}

	let string_mode = index.track_by_key().is_none();
	let needle = search.trim().to_lowercase();
	let mut positions = Vec::new();

	for (position, (key, value)) in index.iter().enumerate() {
		let matched = match matcher {
			SearchMatcher::Custom(callback) => callback(search, value, key),
			SearchMatcher::Default(mode) => {
				mode.matches(&needle, label_of(key, value, label_field, string_mode)?)
			}
		};
		if matched {
			positions.push(position);
		}
	}

	tracing::trace!(
		search,
		matched = positions.len(),
		total = index.len(),
		"filtered options"
	);

	Ok(FilteredIndex {
		index: Arc::clone(index),
		positions: Some(positions),
	})
}
