/// Per-request values the router consumes.
///
/// A context is built once per request by whatever receives it off the wire
/// and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
	method: String,
	request_uri: String,
	path_info: String,
	query_string: String,
	script_name: String,
	server_name: String,
	server_port: u16,
	protocol: String,
}

impl RequestContext {
	/// Creates a context from a method and a raw request URI such as `/news/42/?page=2`.
	pub fn new(method: impl Into<String>, request_uri: impl Into<String>) -> Self {
		let method: String = method.into();
		let mut ctx = Self {
			method: method.to_ascii_uppercase(),
			request_uri: request_uri.into(),
			path_info: String::new(),
			query_string: String::new(),
			script_name: String::new(),
			server_name: "localhost".to_owned(),
			server_port: 80,
			protocol: "HTTP/1.1".to_owned(),
		};
		ctx.derive();
		ctx
	}

	/// Sets the front controller's script name; the path becomes relative to it.
	pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
		self.script_name = script_name.into();
		self.derive();
		self
	}

	pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
		self.server_name = server_name.into();
		self
	}

	pub fn with_server_port(mut self, server_port: u16) -> Self {
		self.server_port = server_port;
		self
	}

	pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
		self.protocol = protocol.into();
		self
	}

	pub fn method(&self) -> &str {
		&self.method
	}

	/// The script-relative request path without trailing slashes; `/` for the root.
	pub fn path(&self) -> &str {
		&self.path_info
	}

	pub fn query_string(&self) -> &str {
		&self.query_string
	}

	pub fn script_name(&self) -> &str {
		&self.script_name
	}

	pub fn server_name(&self) -> &str {
		&self.server_name
	}

	pub fn server_port(&self) -> u16 {
		self.server_port
	}

	pub fn protocol(&self) -> &str {
		&self.protocol
	}

	fn derive(&mut self) {
		let (path, query) = match self.request_uri.split_once('?') {
			Some((path, query)) => (path, query),
			None => (self.request_uri.as_str(), ""),
		};

		let path = strip_base(path, &self.script_name);
		let path = path.trim_end_matches('/');

		self.path_info = if path.starts_with('/') {
			path.to_owned()
		} else {
			format!("/{}", path)
		};
		self.query_string = query.to_owned();
	}
}

/// Strips the script name, or failing that its directory, from the front of `path`.
fn strip_base<'a>(path: &'a str, script_name: &str) -> &'a str {
	if script_name.is_empty() {
		return path;
	}

	let dir = script_name
		.rfind('/')
		.map(|i| &script_name[..i])
		.unwrap_or_default();

	[script_name, dir]
		.iter()
		.filter(|base| !base.is_empty())
		.find_map(|base| {
			path.strip_prefix(*base)
				.filter(|rest| rest.is_empty() || rest.starts_with('/'))
		})
		.unwrap_or(path)
}
