//! Search filtering over an option index.

mod filter;
mod matcher;

pub use filter::{FilteredIndex, filter};
pub use matcher::{MatchMode, MatcherCallback, SearchMatcher, label_of};
