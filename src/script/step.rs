use std::fmt;
use std::str::FromStr;

use selectbox_core::{Key, OptionKey};

use super::ScriptError;

/// Elements of the headless document a step can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
	/// The control itself.
	Container,
	/// The search input inside the control.
	Search,
	/// The dropdown, rendered outside the control's subtree.
	Menu,
	/// Anything else on the page.
	Outside,
}

impl Element {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Container => "container",
			Self::Search => "search",
			Self::Menu => "menu",
			Self::Outside => "outside",
		}
	}
}

impl FromStr for Element {
	type Err = String;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		match text {
			"container" => Ok(Self::Container),
			"search" => Ok(Self::Search),
			"menu" => Ok(Self::Menu),
			"outside" => Ok(Self::Outside),
			other => Err(format!(
				"unknown element '{other}' (expected container, search, menu or outside)"
			)),
		}
	}
}

/// One line of a driver script.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
	/// Type characters, either into the control or the focused search input.
	Type(String),
	/// Press a named key.
	Key(Key),
	/// Replace the search input's text.
	Search(String),
	FocusSearch,
	BlurSearch,
	/// Pointer press on an element.
	Click(Element),
	/// Tab key moving focus to an element.
	Tab(Element),
	/// Pointer pick of a rendered option.
	Pick(OptionKey),
	/// Next animation frame: deferred focus checks and placement run.
	Frame,
	/// The running open/close transition ends.
	Settle,
	Scroll,
	Clear,
	Commit,
	Open,
	Close,
}

impl FromStr for Step {
	type Err = String;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let (command, argument) = match line.split_once(char::is_whitespace) {
			Some((command, rest)) => (command, Some(rest.trim())),
			None => (line, None),
		};
		let argument = argument.filter(|rest| !rest.is_empty());

		let required = |what: &str| {
			argument
				.map(str::to_string)
				.ok_or_else(|| format!("'{command}' needs {what}"))
		};
		let element = || required("an element").and_then(|name| name.parse::<Element>());

		let step = match command {
			"type" => Self::Type(required("text")?),
			"key" => Self::Key(Key::from_name(&required("a key name")?)),
			"search" => Self::Search(argument.unwrap_or_default().to_string()),
			"focus-search" => Self::FocusSearch,
			"blur-search" => Self::BlurSearch,
			"click" => Self::Click(element()?),
			"tab" => Self::Tab(element()?),
			"pick" => Self::Pick(OptionKey::parse(&required("an option key")?)),
			"frame" => Self::Frame,
			"settle" => Self::Settle,
			"scroll" => Self::Scroll,
			"clear" => Self::Clear,
			"commit" => Self::Commit,
			"open" => Self::Open,
			"close" => Self::Close,
			other => return Err(format!("unknown step '{other}'")),
		};
		Ok(step)
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Type(text) => write!(f, "type {text}"),
			Self::Key(key) => write!(f, "key {key}"),
			Self::Search(text) if text.is_empty() => f.write_str("search"),
			Self::Search(text) => write!(f, "search {text}"),
			Self::FocusSearch => f.write_str("focus-search"),
			Self::BlurSearch => f.write_str("blur-search"),
			Self::Click(element) => write!(f, "click {}", element.as_str()),
			Self::Tab(element) => write!(f, "tab {}", element.as_str()),
			Self::Pick(key) => write!(f, "pick {key}"),
			Self::Frame => f.write_str("frame"),
			Self::Settle => f.write_str("settle"),
			Self::Scroll => f.write_str("scroll"),
			Self::Clear => f.write_str("clear"),
			Self::Commit => f.write_str("commit"),
			Self::Open => f.write_str("open"),
			Self::Close => f.write_str("close"),
		}
	}
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
	let mut steps = Vec::new();
	for (number, line) in text.lines().enumerate() {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}
		let step = line.parse().map_err(|message| ScriptError::Parse {
			line: number + 1,
			message,
		})?;
		steps.push(step);
	}
	Ok(steps)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_commands_with_and_without_arguments() {
		let steps = parse_script(
			"# pick red\n\
			 type re\n\
			 key ArrowDown\n\
			 \n\
			 click outside\n\
			 pick 2\n\
			 search\n\
			 frame\n",
		)
		.expect("script");

		assert_eq!(
			steps,
			vec![
				Step::Type("re".into()),
				Step::Key(Key::ArrowDown),
				Step::Click(Element::Outside),
				Step::Pick(OptionKey::Int(2)),
				Step::Search(String::new()),
				Step::Frame,
			]
		);
	}

	#[test]
	fn pick_keeps_zero_padded_keys_as_text() {
		let step: Step = "pick 007".parse().expect("step");
		assert_eq!(step, Step::Pick(OptionKey::from("007")));
		assert_eq!(step.to_string(), "pick 007");
	}

	#[test]
	fn typed_text_keeps_inner_spaces() {
		let step: Step = "type  new york ".parse().expect("step");
		assert_eq!(step, Step::Type("new york".into()));
		assert_eq!(step.to_string(), "type new york");
	}

	#[test]
	fn errors_carry_line_numbers() {
		let err = parse_script("open\n\nwiggle\n").expect_err("bad step");
		assert_eq!(
			err,
			ScriptError::Parse {
				line: 3,
				message: "unknown step 'wiggle'".into(),
			}
		);

		let err = parse_script("click sideways").expect_err("bad element");
		assert!(err.to_string().contains("unknown element 'sideways'"));

		let err = parse_script("type").expect_err("missing text");
		assert!(err.to_string().contains("'type' needs text"));
	}
}
