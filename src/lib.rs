//! A dead simple pattern-based HTTP request router.
//!
//! ```
//! use grout::{Handler, RequestContext, Router, Rules, Signature};
//!
//! # fn main() -> Result<(), grout::Error> {
//! let mut builder = Router::builder();
//! builder.handlers_mut().function(
//! 	"show_news",
//! 	Signature::new().required("slug").required("id"),
//! 	|args, _ctx| Ok(format!("news {} ({})", args[0], args[1])),
//! );
//!
//! let mut rules = Rules::new();
//! rules.insert("id".into(), "numeric".into());
//! rules.insert("slug".into(), "alphanumeric_full".into());
//!
//! builder
//! 	.get("/", Handler::new(Signature::new(), |_, _| Ok("home".to_string())))?
//! 	.get_with("/news/{id}/{slug}", "show_news", rules)?;
//! let router = builder.build();
//!
//! let out = router.dispatch(&RequestContext::new("GET", "/news/42/hello-world/"))?;
//! assert_eq!(out, "news hello-world (42)");
//! # Ok(())
//! # }
//! ```
//!
//! Path segments denoted with `{name}` are captured. A placeholder never spans a `/` and by
//! default accepts letters, digits and underscores; a per-route rule map can restrict it to one
//! of the built-in [`Rule`]s. Matching is case-insensitive and routes are tried in the order they
//! were registered: the first match wins.
//!
//! Handlers declare the parameters they take as a [`Signature`]. Captured values are passed in
//! the order the signature lists them, not the order they appear in the path.
//!
//! With the `http` feature, `HttpRouter` serves a router to hyper and exposes
//! `internal_error_handler` and `not_found_handler` to turn failed dispatches into responses.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

mod context;
mod error;
mod handler;
mod pattern;
mod registry;
mod rule;

/// Contains the core structs of the router.
///
/// Use the RouterBuilder to collect routes, then build a Router to dispatch requests.
pub mod router;

pub use context::*;
pub use error::*;
pub use handler::*;
pub use pattern::*;
pub use registry::*;
pub use router::*;
pub use rule::*;
