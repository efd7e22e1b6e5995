use crate::{
	context::RequestContext,
	error::{Error, Result},
	pattern::Params,
};
use std::{
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

/// Separates the class and method halves of a `Class@method` target.
pub const METHOD_DELIMITER: char = '@';

type HandlerFn<T> = dyn Fn(Vec<String>, &RequestContext) -> anyhow::Result<T> + Send + Sync;

/// A declared handler parameter, optionally with a default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	pub name: String,
	pub default: Option<String>,
}

/// The ordered parameter list a handler expects to be called with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature(Vec<Param>);

impl Signature {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn required(mut self, name: impl Into<String>) -> Self {
		self.0.push(Param {
			name: name.into(),
			default: None,
		});
		self
	}

	pub fn optional(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
		self.0.push(Param {
			name: name.into(),
			default: Some(default.into()),
		});
		self
	}

	pub fn params(&self) -> &[Param] {
		&self.0
	}

	/// Orders `params` to match this signature.
	///
	/// Captures without a declared parameter are dropped; declared parameters
	/// without a capture take their default or fail.
	pub fn arrange(&self, params: &Params) -> Result<Vec<String>> {
		self.0
			.iter()
			.map(|param| match (params.get(&param.name), &param.default) {
				(Some(value), _) => Ok(value.to_owned()),
				(None, Some(default)) => Ok(default.clone()),
				(None, None) => Err(Error::MissingParameter {
					name: param.name.clone(),
					available: params.names(),
				}),
			})
			.collect()
	}
}

impl<S: Into<String>> FromIterator<S> for Signature {
	/// Collects a list of required parameter names.
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		iter.into_iter().fold(Signature::new(), Signature::required)
	}
}

/// An invocable handler together with the parameters it declares.
pub struct Handler<T> {
	signature: Signature,
	call: Arc<HandlerFn<T>>,
}

impl<T> Handler<T> {
	pub fn new<F>(signature: Signature, f: F) -> Self
	where
		F: Fn(Vec<String>, &RequestContext) -> anyhow::Result<T> + Send + Sync + 'static,
	{
		Self {
			signature,
			call: Arc::new(f),
		}
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	/// Arranges `params` against the signature and calls the handler.
	pub fn invoke(&self, params: &Params, ctx: &RequestContext) -> Result<T> {
		let args = self.signature.arrange(params)?;
		Ok((self.call)(args, ctx)?)
	}
}

impl<T> Clone for Handler<T> {
	fn clone(&self) -> Self {
		Self {
			signature: self.signature.clone(),
			call: Arc::clone(&self.call),
		}
	}
}

impl<T> Debug for Handler<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handler")
			.field("signature", &self.signature)
			.finish_non_exhaustive()
	}
}

/// What a route dispatches to.
pub enum Target<T> {
	/// A free function name or `Class@method`, looked up in the [`HandlerRegistry`].
	Named(String),
	/// An inline handler.
	Callable(Handler<T>),
}

impl<T> Clone for Target<T> {
	fn clone(&self) -> Self {
		match self {
			Target::Named(name) => Target::Named(name.clone()),
			Target::Callable(handler) => Target::Callable(handler.clone()),
		}
	}
}

impl<T> Debug for Target<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Target::Named(name) => f.write_str(name),
			Target::Callable(_) => f.write_str("<callable>"),
		}
	}
}

impl<T> From<&str> for Target<T> {
	fn from(name: &str) -> Self {
		Target::Named(name.to_owned())
	}
}

impl<T> From<String> for Target<T> {
	fn from(name: String) -> Self {
		Target::Named(name)
	}
}

impl<T> From<Handler<T>> for Target<T> {
	fn from(handler: Handler<T>) -> Self {
		Target::Callable(handler)
	}
}

/// Startup table mapping handler names to handlers.
pub struct HandlerRegistry<T> {
	functions: HashMap<String, Handler<T>>,
	classes: HashMap<String, HashMap<String, Handler<T>>>,
}

impl<T> Default for HandlerRegistry<T> {
	fn default() -> Self {
		Self {
			functions: HashMap::new(),
			classes: HashMap::new(),
		}
	}
}

impl<T> Debug for HandlerRegistry<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("HandlerRegistry")
			.field("functions", &self.functions.keys().collect::<Vec<_>>())
			.field("classes", &self.classes.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl<T: 'static> HandlerRegistry<T> {
	/// Registers a free function under `name`.
	pub fn function<F>(&mut self, name: impl Into<String>, signature: Signature, f: F) -> &mut Self
	where
		F: Fn(Vec<String>, &RequestContext) -> anyhow::Result<T> + Send + Sync + 'static,
	{
		self.functions.insert(name.into(), Handler::new(signature, f));
		self
	}

	/// Registers `method` on `class`. Each call runs on a fresh `C::default()`.
	pub fn method<C, F>(
		&mut self,
		class: impl Into<String>,
		method: impl Into<String>,
		signature: Signature,
		f: F,
	) -> &mut Self
	where
		C: Default + 'static,
		F: Fn(&mut C, Vec<String>, &RequestContext) -> anyhow::Result<T> + Send + Sync + 'static,
	{
		let handler = instance_handler(signature, f);
		self.classes
			.entry(class.into())
			.or_default()
			.insert(method.into(), handler);
		self
	}
}

fn instance_handler<T, C, F>(signature: Signature, f: F) -> Handler<T>
where
	T: 'static,
	C: Default + 'static,
	F: Fn(&mut C, Vec<String>, &RequestContext) -> anyhow::Result<T> + Send + Sync + 'static,
{
	Handler::new(signature, move |args, ctx| {
		let mut instance = C::default();
		f(&mut instance, args, ctx)
	})
}

impl<T> HandlerRegistry<T> {
	/// Resolves a target to a handler.
	///
	/// A free function of that name takes precedence; otherwise the target
	/// must have the `Class@method` shape.
	pub fn resolve<'a>(&'a self, target: &'a Target<T>) -> Result<&'a Handler<T>> {
		let name = match target {
			Target::Callable(handler) => return Ok(handler),
			Target::Named(name) => name,
		};

		if let Some(handler) = self.functions.get(name) {
			return Ok(handler);
		}

		let (class, method) = name
			.split_once(METHOD_DELIMITER)
			.ok_or_else(|| Error::MalformedTarget(name.clone()))?;

		let undefined = |reason: String| Error::UndefinedHandler {
			target: name.clone(),
			reason,
		};

		self.classes
			.get(class)
			.ok_or_else(|| undefined(format!("class `{}` does not exist", class)))?
			.get(method)
			.ok_or_else(|| undefined(format!("class `{}` has no method `{}`", class, method)))
	}
}
