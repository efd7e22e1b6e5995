use crate::{
	error::{Error, Result},
	rule::{Rule, Rules},
};
use regex::{Regex, RegexBuilder};
use std::fmt::{self, Display, Formatter};

/// Named values captured from a request path, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn names(&self) -> Vec<String> {
		self.0.iter().map(|(key, _)| key.clone()).collect()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	fn insert(&mut self, name: &str, value: &str) {
		match self.0.iter_mut().find(|(key, _)| key == name) {
			Some(entry) => entry.1 = value.to_owned(),
			None => self.0.push((name.to_owned(), value.to_owned())),
		}
	}
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
	Literal(&'a str),
	Placeholder(&'a str),
}

/// Splits a route template into literal runs and `{name}` placeholders.
///
/// A placeholder name may not be empty or contain `/`, `{` or `}`; anything
/// that fails those checks stays literal text.
fn scan(raw: &str) -> Vec<Segment<'_>> {
	let mut segments = vec![];
	let mut literal_start = 0;
	let mut cursor = 0;

	while let Some(open) = raw[cursor..].find('{').map(|i| cursor + i) {
		let rest = &raw[open + 1..];
		let end = rest.find(|c: char| c == '/' || c == '{' || c == '}');

		match end {
			Some(len) if len > 0 && rest[len..].starts_with('}') => {
				if literal_start < open {
					segments.push(Segment::Literal(&raw[literal_start..open]));
				}
				segments.push(Segment::Placeholder(&rest[..len]));
				cursor = open + 1 + len + 1;
				literal_start = cursor;
			}
			_ => cursor = open + 1,
		}
	}

	if literal_start < raw.len() {
		segments.push(Segment::Literal(&raw[literal_start..]));
	}
	segments
}

/// A route template compiled into an anchored, case-insensitive matcher.
///
/// Only ASCII letters are folded: literal text is lowercased when compiled
/// and paths are lowercased before matching. Captured values are sliced from
/// the original path, so they keep the request's case.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	pattern: String,
	regex: Regex,
	/// Placeholder name for each capture group, indexed by group number - 1.
	names: Vec<String>,
}

impl CompiledPattern {
	/// Compiles `raw` using `rules` to constrain its placeholders.
	///
	/// Placeholders without a rule accept one or more characters of the
	/// default class. Every occurrence of a repeated placeholder is compiled
	/// independently with the same rule.
	pub fn compile(raw: &str, rules: &Rules) -> Result<Self> {
		let mut expr = String::from("^");
		let mut names = vec![];

		for segment in scan(raw) {
			match segment {
				Segment::Literal(text) => expr.push_str(&regex::escape(&text.to_ascii_lowercase())),
				Segment::Placeholder(name) => {
					let class = match rules.get(name) {
						Some(id) => Rule::resolve(id)?,
						None => Rule::default().class(),
					};

					// group names are generated so placeholder names need not be valid regex identifiers
					expr.push_str(&format!("(?P<p{}>{}+)", names.len(), class));
					names.push(name.to_owned());
				}
			}
		}
		expr.push('$');

		let regex = RegexBuilder::new(&expr)
			.build()
			.map_err(|source| Error::InvalidPattern {
				pattern: raw.to_owned(),
				source,
			})?;

		Ok(Self {
			pattern: raw.to_owned(),
			regex,
			names,
		})
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Placeholder names in the order they appear, duplicates included.
	pub fn param_names(&self) -> &[String] {
		&self.names
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(&path.to_ascii_lowercase())
	}

	/// Matches `path`, returning the named captures. When a name occurs more
	/// than once the last occurrence wins.
	pub fn captures(&self, path: &str) -> Option<Params> {
		// ascii folding keeps byte offsets, so spans index the original path
		let folded = path.to_ascii_lowercase();
		let caps = self.regex.captures(&folded)?;
		let mut params = Params::default();

		for (i, name) in self.names.iter().enumerate() {
			if let Some(m) = caps.get(i + 1) {
				params.insert(name, &path[m.range()]);
			}
		}
		Some(params)
	}
}

impl Display for CompiledPattern {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.pattern)
	}
}

#[cfg(test)]
mod test {
	use super::{scan, CompiledPattern, Segment};
	use crate::{Error, Rules};

	fn rules(pairs: &[(&str, &str)]) -> Rules {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn scans_placeholders() {
		assert_eq!(
			scan("/news/{id}/x{a}"),
			vec![
				Segment::Literal("/news/"),
				Segment::Placeholder("id"),
				Segment::Literal("/x"),
				Segment::Placeholder("a"),
			]
		);
	}

	#[test]
	fn placeholders_do_not_span_separators() {
		assert_eq!(scan("/{a/b}"), vec![Segment::Literal("/{a/b}")]);
		assert_eq!(scan("/{}"), vec![Segment::Literal("/{}")]);
		assert_eq!(
			scan("/{{id}"),
			vec![Segment::Literal("/{"), Segment::Placeholder("id")]
		);
		assert_eq!(scan("/{open"), vec![Segment::Literal("/{open")]);
	}

	#[test]
	fn literal_patterns_match_exactly() {
		let pattern = CompiledPattern::compile("/about.html", &Rules::new()).unwrap();
		assert!(pattern.param_names().is_empty());
		assert!(pattern.is_match("/about.html"));
		assert!(pattern.is_match("/ABOUT.html"));
		assert!(!pattern.is_match("/aboutxhtml"));
		assert!(!pattern.is_match("/about.html/more"));
		assert!(!pattern.is_match("/prefix/about.html"));
		assert_eq!(pattern.captures("/about.html").unwrap().len(), 0);
	}

	#[test]
	fn numeric_rule() {
		let pattern = CompiledPattern::compile("/news/{id}", &rules(&[("id", "numeric")])).unwrap();
		assert_eq!(pattern.captures("/news/42").unwrap().get("id"), Some("42"));
		assert!(pattern.captures("/news/abc").is_none());
		assert!(pattern.captures("/news/").is_none());
	}

	#[test]
	fn default_class_excludes_separators_and_hyphens() {
		let pattern = CompiledPattern::compile("/u/{name}", &Rules::new()).unwrap();
		assert!(pattern.is_match("/u/some_user1"));
		assert!(!pattern.is_match("/u/a/b"));
		assert!(!pattern.is_match("/u/a-b"));

		let full = CompiledPattern::compile("/u/{name}", &rules(&[("name", "alphanumeric_full")])).unwrap();
		assert!(full.is_match("/u/a-b_c"));
	}

	#[test]
	fn captures_keep_their_case() {
		let pattern = CompiledPattern::compile("/Users/{name}", &rules(&[("name", "letters")])).unwrap();
		let params = pattern.captures("/users/Alice").unwrap();
		assert_eq!(params.get("name"), Some("Alice"));
	}

	#[test]
	fn folds_ascii_only() {
		let pattern = CompiledPattern::compile("/users", &Rules::new()).unwrap();
		assert!(pattern.is_match("/USERS"));
		assert!(!pattern.is_match("/u\u{17f}ers"));

		let pattern = CompiledPattern::compile("/Café", &Rules::new()).unwrap();
		assert!(pattern.is_match("/CAFé"));
		assert!(!pattern.is_match("/CAFÉ"));
	}

	#[test]
	fn repeated_placeholders_are_compiled_independently() {
		let pattern = CompiledPattern::compile("/{id}/{id}", &rules(&[("id", "numeric")])).unwrap();
		assert_eq!(pattern.param_names(), ["id", "id"]);
		assert!(!pattern.is_match("/1/a"));
		assert_eq!(pattern.captures("/1/2").unwrap().get("id"), Some("2"));
	}

	#[test]
	fn placeholder_names_need_not_be_identifiers() {
		let pattern = CompiledPattern::compile("/{post-id}", &Rules::new()).unwrap();
		assert_eq!(pattern.captures("/7").unwrap().get("post-id"), Some("7"));
	}

	#[test]
	fn unknown_rule_fails() {
		let err = CompiledPattern::compile("/{id}", &rules(&[("id", "numberic")])).unwrap_err();
		assert!(matches!(err, Error::UnknownRule(ref id) if id == "numberic"));
	}

	#[test]
	fn rules_for_absent_placeholders_are_ignored() {
		let pattern = CompiledPattern::compile("/static", &rules(&[("id", "bogus")])).unwrap();
		assert!(pattern.is_match("/static"));
	}
}
