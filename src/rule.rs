use crate::error::{Error, Result};
use std::{
	collections::HashMap,
	fmt::{self, Display, Formatter},
	str::FromStr,
};

/// Per-route mapping of placeholder name to rule identifier.
pub type Rules = HashMap<String, String>;

/// A named character class a placeholder can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rule {
	Numeric,
	Letters,
	Alphanumeric,
	#[default]
	AlphanumericUnderscore,
	AlphanumericFull,
}

impl Rule {
	pub const ALL: [Rule; 5] = [
		Rule::Numeric,
		Rule::Letters,
		Rule::Alphanumeric,
		Rule::AlphanumericUnderscore,
		Rule::AlphanumericFull,
	];

	/// Looks up a rule identifier and returns its character class.
	pub fn resolve(id: &str) -> Result<&'static str> {
		id.parse::<Rule>().map(Rule::class)
	}

	pub fn id(self) -> &'static str {
		match self {
			Rule::Numeric => "numeric",
			Rule::Letters => "letters",
			Rule::Alphanumeric => "alphanumeric",
			Rule::AlphanumericUnderscore => "alphanumeric_underscore",
			Rule::AlphanumericFull => "alphanumeric_full",
		}
	}

	/// The bracket expression matching a single character of this rule.
	pub fn class(self) -> &'static str {
		match self {
			Rule::Numeric => "[[:digit:]]",
			Rule::Letters => "[[:alpha:]]",
			Rule::Alphanumeric => "[[:alnum:]]",
			Rule::AlphanumericUnderscore => "[[:alnum:]_]",
			Rule::AlphanumericFull => r"[[:alnum:]_\-]",
		}
	}
}

impl FromStr for Rule {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Rule::ALL
			.iter()
			.copied()
			.find(|rule| rule.id() == s)
			.ok_or_else(|| Error::UnknownRule(s.to_owned()))
	}
}

impl Display for Rule {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}
