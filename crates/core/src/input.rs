//! Keyboard input understood by the engine.

use std::fmt;

/// A key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
	/// A single printable character.
	Char(char),
	ArrowUp,
	ArrowDown,
	ArrowLeft,
	ArrowRight,
	Enter,
	Escape,
	Tab,
	/// Any other named key; ignored by the engine.
	Other(String),
}

impl Key {
	/// Parse a DOM-style key name (`"ArrowDown"`, `"Enter"`, `"a"`, ...).
	///
	/// Short aliases such as `down` and `esc` are accepted as well.
	#[must_use]
	pub fn from_name(name: &str) -> Self {
		let mut chars = name.chars();
		if let (Some(ch), None) = (chars.next(), chars.next()) {
			return Self::Char(ch);
		}

		match name.to_ascii_lowercase().as_str() {
			"arrowup" | "up" => Self::ArrowUp,
			"arrowdown" | "down" => Self::ArrowDown,
			"arrowleft" | "left" => Self::ArrowLeft,
			"arrowright" | "right" => Self::ArrowRight,
			"enter" | "return" => Self::Enter,
			"escape" | "esc" => Self::Escape,
			"tab" => Self::Tab,
			"space" => Self::Char(' '),
			_ => Self::Other(name.to_string()),
		}
	}

	/// Returns `true` for keys that insert a character.
	#[must_use]
	pub fn is_printable(&self) -> bool {
		matches!(self, Self::Char(ch) if !ch.is_control())
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Char(ch) => write!(f, "{ch}"),
			Self::ArrowUp => f.write_str("ArrowUp"),
			Self::ArrowDown => f.write_str("ArrowDown"),
			Self::ArrowLeft => f.write_str("ArrowLeft"),
			Self::ArrowRight => f.write_str("ArrowRight"),
			Self::Enter => f.write_str("Enter"),
			Self::Escape => f.write_str("Escape"),
			Self::Tab => f.write_str("Tab"),
			Self::Other(name) => f.write_str(name),
		}
	}
}
