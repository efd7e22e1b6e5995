use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while registering routes or dispatching a request.
#[derive(Debug, Error)]
pub enum Error {
	#[error("unknown rule `{0}`")]
	UnknownRule(String),

	#[error("rules already attached to {method} {pattern}")]
	DuplicateRouteRules { method: String, pattern: String },

	#[error("unsupported method `{0}`")]
	UnsupportedMethod(String),

	#[error("undefined handler `{target}`: {reason}")]
	UndefinedHandler { target: String, reason: String },

	#[error("malformed handler target `{0}`")]
	MalformedTarget(String),

	#[error("missing parameter `{name}` (available: {})", .available.join(", "))]
	MissingParameter { name: String, available: Vec<String> },

	#[error("no route for {method} {path}")]
	RouteNotFound { method: String, path: String },

	#[error("invalid pattern `{pattern}`: {source}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error(transparent)]
	Handler(#[from] anyhow::Error),
}

impl Error {
	/// Whether this error means no route matched, as opposed to a routing or handler failure.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Error::RouteNotFound { .. })
	}
}
