use crate::{
	context::RequestContext,
	error::{Error, Result},
	handler::{HandlerRegistry, Target},
	pattern::{CompiledPattern, Params},
	registry::{Method, Route, RouteRegistry},
	rule::{Rule, Rules},
};
use std::{collections::HashMap, sync::Arc};

/// Collects routes and handlers, then freezes them into a [`Router`].
#[derive(Debug)]
pub struct RouterBuilder<T> {
	routes: RouteRegistry<T>,
	handlers: HandlerRegistry<T>,
	strict_rules: bool,
}

impl<T> Default for RouterBuilder<T> {
	fn default() -> Self {
		Self {
			routes: RouteRegistry::default(),
			handlers: HandlerRegistry::default(),
			strict_rules: true,
		}
	}
}

impl<T> RouterBuilder<T> {
	/// Whether unknown rule identifiers are rejected at registration (the
	/// default). When disabled, routes referencing them never match.
	pub fn strict_rules(&mut self, strict: bool) -> &mut Self {
		self.strict_rules = strict;
		self
	}

	/// Installs the table named targets are resolved against.
	pub fn handlers(&mut self, handlers: HandlerRegistry<T>) -> &mut Self {
		self.handlers = handlers;
		self
	}

	pub fn handlers_mut(&mut self) -> &mut HandlerRegistry<T> {
		&mut self.handlers
	}

	/// Registers a route for the method named `method`.
	///
	/// Fails with [`Error::UnsupportedMethod`] unless `method` is one of
	/// `GET`, `POST`, `PUT` or `DELETE`.
	pub fn register(
		&mut self,
		method: &str,
		pattern: &str,
		target: impl Into<Target<T>>,
		rules: Rules,
	) -> Result<&mut Self> {
		self.add(method.parse()?, pattern, target, rules)
	}

	fn add(&mut self, method: Method, pattern: &str, target: impl Into<Target<T>>, rules: Rules) -> Result<&mut Self> {
		if self.strict_rules {
			for id in rules.values() {
				id.parse::<Rule>()?;
			}
		}

		self.routes.register(method, pattern, target.into(), rules)?;
		Ok(self)
	}

	pub fn get(&mut self, pattern: &str, target: impl Into<Target<T>>) -> Result<&mut Self> {
		self.add(Method::Get, pattern, target, Rules::new())
	}

	pub fn post(&mut self, pattern: &str, target: impl Into<Target<T>>) -> Result<&mut Self> {
		self.add(Method::Post, pattern, target, Rules::new())
	}

	pub fn put(&mut self, pattern: &str, target: impl Into<Target<T>>) -> Result<&mut Self> {
		self.add(Method::Put, pattern, target, Rules::new())
	}

	pub fn delete(&mut self, pattern: &str, target: impl Into<Target<T>>) -> Result<&mut Self> {
		self.add(Method::Delete, pattern, target, Rules::new())
	}

	pub fn get_with(&mut self, pattern: &str, target: impl Into<Target<T>>, rules: Rules) -> Result<&mut Self> {
		self.add(Method::Get, pattern, target, rules)
	}

	pub fn post_with(&mut self, pattern: &str, target: impl Into<Target<T>>, rules: Rules) -> Result<&mut Self> {
		self.add(Method::Post, pattern, target, rules)
	}

	pub fn put_with(&mut self, pattern: &str, target: impl Into<Target<T>>, rules: Rules) -> Result<&mut Self> {
		self.add(Method::Put, pattern, target, rules)
	}

	pub fn delete_with(&mut self, pattern: &str, target: impl Into<Target<T>>, rules: Rules) -> Result<&mut Self> {
		self.add(Method::Delete, pattern, target, rules)
	}

	/// Compiles every registered pattern and returns the frozen router.
	pub fn build(self) -> Router<T> {
		let mut patterns = HashMap::new();

		for method in Method::ALL.iter().copied() {
			let mut by_pattern: HashMap<&str, Arc<Result<CompiledPattern>>> = HashMap::new();
			let compiled = self
				.routes
				.routes_for(method)
				.iter()
				.map(|route| {
					let compiled = by_pattern.entry(route.pattern.as_str()).or_insert_with(|| {
						let empty = Rules::new();
						let rules = self.routes.rules_for(method, &route.pattern).unwrap_or(&empty);
						let compiled = CompiledPattern::compile(&route.pattern, rules);
						if let Err(e) = &compiled {
							tracing::warn!(%method, pattern = %route.pattern, error = %e, "route will never match");
						}
						Arc::new(compiled)
					});
					Arc::clone(compiled)
				})
				.collect::<Vec<_>>();
			patterns.insert(method, compiled);
		}

		Router {
			routes: self.routes,
			handlers: self.handlers,
			patterns,
		}
	}
}

/// A route that matched a request, with the values captured from its path.
#[derive(Debug)]
pub struct Matched<'a, T> {
	pub route: &'a Route<T>,
	pub params: Params,
}

/// Matches requests against the registered routes and invokes their handlers.
///
/// A router is immutable once built and can be shared between threads.
#[derive(Debug)]
pub struct Router<T> {
	routes: RouteRegistry<T>,
	handlers: HandlerRegistry<T>,
	/// Compiled patterns per method, parallel to the registry's routes.
	patterns: HashMap<Method, Vec<Arc<Result<CompiledPattern>>>>,
}

impl<T> Router<T> {
	pub fn builder() -> RouterBuilder<T> {
		RouterBuilder::default()
	}

	pub fn routes(&self) -> &RouteRegistry<T> {
		&self.routes
	}

	/// Finds the first route registered for `method` whose pattern matches `path`.
	///
	/// Routes are tried strictly in registration order. A route whose pattern
	/// failed to compile is skipped.
	pub fn find(&self, method: &str, path: &str) -> Result<Matched<'_, T>> {
		let not_found = || Error::RouteNotFound {
			method: method.to_owned(),
			path: path.to_owned(),
		};
		let method = method.parse::<Method>().map_err(|_| not_found())?;

		let compiled = self.patterns.get(&method).map(Vec::as_slice).unwrap_or_default();

		for (route, pattern) in self.routes.routes_for(method).iter().zip(compiled) {
			let pattern = match &**pattern {
				Ok(pattern) => pattern,
				Err(e) => {
					tracing::trace!(%method, pattern = %route.pattern, error = %e, "skipping route");
					continue;
				}
			};

			tracing::trace!(%method, pattern = %route.pattern, path, "trying route");
			if let Some(params) = pattern.captures(path) {
				tracing::debug!(%method, pattern = %route.pattern, path, ?params, "matched route");
				return Ok(Matched { route, params });
			}
		}

		tracing::debug!(%method, path, "no route matched");
		Err(not_found())
	}

	/// Routes the request described by `ctx` and returns its handler's output.
	///
	/// Literal text matches without regard to ASCII case, but captured values
	/// are passed to the handler exactly as they appear in the request path:
	/// `/u/{name}` on `/U/Alice` yields `Alice`, not `alice`.
	pub fn dispatch(&self, ctx: &RequestContext) -> Result<T> {
		let Matched { route, params } = self.find(ctx.method(), ctx.path())?;
		let handler = self.handlers.resolve(&route.target)?;
		handler.invoke(&params, ctx)
	}
}
