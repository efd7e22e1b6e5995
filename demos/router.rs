use grout::{
	hyper::{Body, Server},
	Handler, HttpRouter, RequestContext, Response, Router, Rules, Signature,
};

#[derive(Default)]
struct NewsController;

impl NewsController {
	fn show(&mut self, args: Vec<String>, ctx: &RequestContext) -> anyhow::Result<Response> {
		dbg!(&args, ctx.query_string());
		Ok(Response::new(Body::from(format!("news {} in {}", args[0], args[1]))))
	}
}

fn home(_args: Vec<String>, _ctx: &RequestContext) -> anyhow::Result<Response> {
	Ok(Response::new(Body::from("home")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let addr = ([127, 0, 0, 1], 3000).into();

	let mut builder = Router::builder();
	builder
		.handlers_mut()
		.function("home", Signature::new(), home)
		.method(
			"NewsController",
			"show",
			Signature::new().required("id").optional("section", "world"),
			NewsController::show,
		);

	let mut rules = Rules::new();
	rules.insert("id".into(), "numeric".into());

	builder
		.get("/", "home")?
		.get_with("/news/{id}", "NewsController@show", rules)?
		.post(
			"/echo/{word}",
			Handler::new(Signature::new().required("word"), |args, _| {
				Ok(Response::new(Body::from(args[0].clone())))
			}),
		)?;

	let router = HttpRouter::from(builder.build());

	let server = Server::bind(&addr).serve(router);
	println!("Listening on http://{}", addr);

	server.await?;
	Ok(())
}
