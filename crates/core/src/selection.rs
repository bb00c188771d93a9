//! Single and multi select selection models.

use crate::option::{OptionKey, OptionValue};

/// Current selection of a control.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
	Single(Option<(OptionKey, OptionValue)>),
	Multi(Vec<(OptionKey, OptionValue)>),
}

/// What a commit did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
	/// Single select: the value replaced the previous one.
	Replaced,
	/// Multi select: the value was added.
	Added,
	/// Multi select: the value was already selected and got removed.
	Removed,
	/// Multi select: adding would exceed `maximum_selections`.
	Rejected,
}

/// Result of [`SelectionCoordinator::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
	pub accepted: bool,
	pub change: SelectionChange,
}

/// Applies commits to a selection and answers membership queries.
///
/// Values are compared by their `track_by_key` field when one is configured,
/// and by plain value equality otherwise.
#[derive(Debug, Clone)]
pub struct SelectionCoordinator {
	selection: Selection,
	track_by_key: Option<String>,
	maximum: usize,
	minimum: usize,
}

impl SelectionCoordinator {
	/// Empty single select coordinator.
	#[must_use]
	pub fn single(track_by_key: Option<String>) -> Self {
		Self {
			selection: Selection::Single(None),
			track_by_key,
			maximum: 0,
			minimum: 0,
		}
	}

	/// Empty multi select coordinator. A `maximum` of 0 means unlimited.
	#[must_use]
	pub fn multi(track_by_key: Option<String>, minimum: usize, maximum: usize) -> Self {
		Self {
			selection: Selection::Multi(Vec::new()),
			track_by_key,
			maximum,
			minimum,
		}
	}

	#[must_use]
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	#[must_use]
	pub fn is_multiple(&self) -> bool {
		matches!(self.selection, Selection::Multi(_))
	}

	pub fn set_track_by_key(&mut self, track_by_key: Option<String>) {
		self.track_by_key = track_by_key;
	}

	/// Apply the user's pick of `key`/`value`.
	pub fn commit(&mut self, key: OptionKey, value: OptionValue) -> CommitOutcome {
		let track_by_key = self.track_by_key.clone();
		let maximum = self.maximum;

		match &mut self.selection {
			Selection::Single(current) => {
				*current = Some((key, value));
				CommitOutcome {
					accepted: true,
					change: SelectionChange::Replaced,
				}
			}
			Selection::Multi(values) => {
				if let Some(position) = values
					.iter()
					.position(|(_, selected)| same_option(track_by_key.as_deref(), selected, &value))
				{
					values.remove(position);
					return CommitOutcome {
						accepted: true,
						change: SelectionChange::Removed,
					};
				}

				if maximum > 0 && values.len() >= maximum {
					tracing::warn!(
						%key,
						maximum,
						"selection limit reached; ignoring commit"
					);
					return CommitOutcome {
						accepted: false,
						change: SelectionChange::Rejected,
					};
				}

				values.push((key, value));
				CommitOutcome {
					accepted: true,
					change: SelectionChange::Added,
				}
			}
		}
	}

	/// Whether `value` is part of the current selection.
	#[must_use]
	pub fn is_selected(&self, value: &OptionValue) -> bool {
		let track_by_key = self.track_by_key.as_deref();
		match &self.selection {
			Selection::Single(current) => current
				.as_ref()
				.is_some_and(|(_, selected)| same_option(track_by_key, selected, value)),
			Selection::Multi(values) => values
				.iter()
				.any(|(_, selected)| same_option(track_by_key, selected, value)),
		}
	}

	/// Remove every selected value. Returns whether anything was selected.
	pub fn clear(&mut self) -> bool {
		match &mut self.selection {
			Selection::Single(current) => current.take().is_some(),
			Selection::Multi(values) => {
				let had_values = !values.is_empty();
				values.clear();
				had_values
			}
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		match &self.selection {
			Selection::Single(current) => usize::from(current.is_some()),
			Selection::Multi(values) => values.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Selected keys in selection order.
	#[must_use]
	pub fn keys(&self) -> Vec<OptionKey> {
		self.entries().map(|(key, _)| key.clone()).collect()
	}

	/// Selected values in selection order.
	#[must_use]
	pub fn values(&self) -> Vec<OptionValue> {
		self.entries().map(|(_, value)| value.clone()).collect()
	}

	pub fn entries(&self) -> impl Iterator<Item = &(OptionKey, OptionValue)> {
		let entries: &[(OptionKey, OptionValue)] = match &self.selection {
			Selection::Single(current) => current.as_slice(),
			Selection::Multi(values) => values,
		};
		entries.iter()
	}

	/// Whether fewer than `minimum_selections` values are selected.
	///
	/// The minimum is advisory: deselecting below it is never blocked.
	#[must_use]
	pub fn below_minimum(&self) -> bool {
		self.is_multiple() && self.len() < self.minimum
	}
}

fn same_option(track_by_key: Option<&str>, a: &OptionValue, b: &OptionValue) -> bool {
	match track_by_key {
		Some(field) => match (a.get(field), b.get(field)) {
			(Some(left), Some(right)) => left == right,
			_ => false,
		},
		None => a == b,
	}
}
