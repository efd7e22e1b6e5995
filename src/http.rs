use crate::{Error, RequestContext, Router};
use hyper::{
	body::Body,
	header::HOST,
	http::StatusCode,
	service::Service,
};
use std::{
	convert::Infallible,
	future::{ready, Ready},
	sync::Arc,
	task::{Context, Poll},
};

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;
pub type Request = hyper::Request<Body>;
pub type Response = hyper::Response<Body>;

fn with_status(status: StatusCode, body: Body) -> Response {
	let mut res = Response::new(body);
	*res.status_mut() = status;
	res
}

fn default_error_handler(e: Error) -> Response {
	with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string().into())
}

fn default_not_found_handler(_ctx: &RequestContext) -> Response {
	with_status(StatusCode::NOT_FOUND, Body::empty())
}

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> Response;

/// A function that handles unroutable requests and creates a response.
pub type NotFoundHandler = fn(ctx: &RequestContext) -> Response;

/// Derives the routing context from a hyper request.
pub fn request_context(req: &Request) -> RequestContext {
	let uri = req.uri();
	let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

	let authority = req
		.headers()
		.get(HOST)
		.and_then(|host| host.to_str().ok())
		.or_else(|| uri.authority().map(|a| a.as_str()));

	let mut ctx = RequestContext::new(req.method().as_str(), target)
		.with_protocol(format!("{:?}", req.version()));

	if let Some(authority) = authority {
		ctx = match authority.rsplit_once(':') {
			Some((host, port)) => match port.parse() {
				Ok(port) => ctx.with_server_name(host).with_server_port(port),
				Err(_) => ctx.with_server_name(authority),
			},
			None => ctx.with_server_name(authority),
		};
	}
	ctx
}

/// Serves a [`Router`] to hyper, turning routing errors into responses.
pub struct HttpRouter {
	router: Arc<Router<Response>>,
	pub internal_error_handler: ErrorHandler,
	pub not_found_handler: NotFoundHandler,
}

impl From<Router<Response>> for HttpRouter {
	fn from(inner: Router<Response>) -> Self {
		Self {
			router: Arc::new(inner),
			internal_error_handler: default_error_handler,
			not_found_handler: default_not_found_handler,
		}
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RouteHandler {
			router: Arc::clone(&self.router),
			internal_error: self.internal_error_handler,
			not_found: self.not_found_handler,
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
pub struct RouteHandler {
	router: Arc<Router<Response>>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl Service<Request> for RouteHandler {
	type Response = Response;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let ctx = request_context(&req);

		let response = match self.router.dispatch(&ctx) {
			Ok(response) => response,
			Err(e) if e.is_not_found() => (self.not_found)(&ctx),
			Err(e) => {
				tracing::error!(method = ctx.method(), path = ctx.path(), error = %e, "request failed");
				(self.internal_error)(e)
			}
		};
		ready(Ok(response))
	}
}
