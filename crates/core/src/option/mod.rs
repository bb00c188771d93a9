//! Normalization of raw option input into a key-addressable index.

mod index;
mod key;

pub use index::{OptionIndex, OptionValue, STRING_VALUE_FIELD};
pub use key::OptionKey;
