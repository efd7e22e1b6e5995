use crate::{
	error::{Error, Result},
	handler::Target,
	rule::Rules,
};
use std::{
	collections::HashMap,
	fmt::{self, Display, Formatter},
	str::FromStr,
};

/// The request methods routes can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Get,
	Post,
	Put,
	Delete,
}

impl Method {
	pub const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Delete];

	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}

impl FromStr for Method {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Method::ALL
			.iter()
			.copied()
			.find(|method| method.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| Error::UnsupportedMethod(s.to_owned()))
	}
}

impl Display for Method {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A registered route. Its rules live in the registry, keyed by pattern.
#[derive(Debug, Clone)]
pub struct Route<T> {
	pub pattern: String,
	pub target: Target<T>,
}

#[derive(Debug)]
struct Bucket<T> {
	routes: Vec<Route<T>>,
	rules: HashMap<String, Rules>,
}

impl<T> Default for Bucket<T> {
	fn default() -> Self {
		Self {
			routes: vec![],
			rules: HashMap::new(),
		}
	}
}

/// Routes per method, in registration order.
#[derive(Debug)]
pub struct RouteRegistry<T> {
	buckets: HashMap<Method, Bucket<T>>,
}

impl<T> Default for RouteRegistry<T> {
	fn default() -> Self {
		Self {
			buckets: Method::ALL
				.iter()
				.map(|method| (*method, Bucket::default()))
				.collect(),
		}
	}
}

impl<T> RouteRegistry<T> {
	/// Appends a route for `method`.
	///
	/// Rules attach to the pattern within the method: every route registered
	/// with that pattern is matched using them, and attaching a second
	/// non-empty rule set to the same pattern fails.
	pub fn register(&mut self, method: Method, pattern: &str, target: Target<T>, rules: Rules) -> Result<()> {
		let bucket = self.buckets.entry(method).or_default();

		if !rules.is_empty() {
			if bucket.rules.contains_key(pattern) {
				return Err(Error::DuplicateRouteRules {
					method: method.to_string(),
					pattern: pattern.to_owned(),
				});
			}
			bucket.rules.insert(pattern.to_owned(), rules);
		}

		tracing::debug!(%method, pattern, ?target, "registered route");
		bucket.routes.push(Route {
			pattern: pattern.to_owned(),
			target,
		});
		Ok(())
	}

	pub fn routes_for(&self, method: Method) -> &[Route<T>] {
		self.buckets
			.get(&method)
			.map(|bucket| bucket.routes.as_slice())
			.unwrap_or_default()
	}

	/// The rules attached to `pattern` under `method`, if any.
	pub fn rules_for(&self, method: Method, pattern: &str) -> Option<&Rules> {
		self.buckets.get(&method)?.rules.get(pattern)
	}
}

#[cfg(test)]
mod test {
	use super::{Method, RouteRegistry};
	use crate::{Error, Rules, Target};

	fn rules(pairs: &[(&str, &str)]) -> Rules {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn parses_methods() {
		assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
		assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
		assert!(matches!(
			"PATCH".parse::<Method>(),
			Err(Error::UnsupportedMethod(ref m)) if m == "PATCH"
		));
	}

	#[test]
	fn keeps_registration_order() {
		let mut registry = RouteRegistry::<()>::default();
		registry.register(Method::Get, "/a", Target::from("a"), Rules::new()).unwrap();
		registry.register(Method::Post, "/b", Target::from("b"), Rules::new()).unwrap();
		registry.register(Method::Get, "/c", Target::from("c"), Rules::new()).unwrap();

		let patterns: Vec<_> = registry
			.routes_for(Method::Get)
			.iter()
			.map(|route| route.pattern.as_str())
			.collect();
		assert_eq!(patterns, ["/a", "/c"]);
		assert_eq!(registry.routes_for(Method::Post).len(), 1);
		assert!(registry.routes_for(Method::Put).is_empty());
	}

	#[test]
	fn duplicate_patterns_without_rules_are_kept() {
		let mut registry = RouteRegistry::<()>::default();
		registry.register(Method::Get, "/p/{id}", Target::from("first"), Rules::new()).unwrap();
		registry.register(Method::Get, "/p/{id}", Target::from("second"), Rules::new()).unwrap();
		assert_eq!(registry.routes_for(Method::Get).len(), 2);
	}

	#[test]
	fn duplicate_rules_are_rejected() {
		let mut registry = RouteRegistry::<()>::default();
		registry
			.register(Method::Get, "/p/{id}", Target::from("a"), rules(&[("id", "numeric")]))
			.unwrap();
		let err = registry
			.register(Method::Get, "/p/{id}", Target::from("b"), rules(&[("id", "letters")]))
			.unwrap_err();
		assert!(matches!(err, Error::DuplicateRouteRules { .. }));
		assert_eq!(registry.routes_for(Method::Get).len(), 1);

		// rules are scoped to the method
		registry
			.register(Method::Post, "/p/{id}", Target::from("c"), rules(&[("id", "letters")]))
			.unwrap();
	}

	#[test]
	fn rules_attach_to_the_pattern() {
		let mut registry = RouteRegistry::<()>::default();
		registry.register(Method::Get, "/p/{id}", Target::from("a"), Rules::new()).unwrap();
		registry
			.register(Method::Get, "/p/{id}", Target::from("b"), rules(&[("id", "numeric")]))
			.unwrap();
		assert_eq!(
			registry.rules_for(Method::Get, "/p/{id}").unwrap().get("id").unwrap(),
			"numeric"
		);
	}
}
