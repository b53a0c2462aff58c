// reqchain/examples/basic_chain.rs

use reqchain::{BufferedResponse, Chain, Delegate, Request, Shared};
use serde_json::{json, Value};
use tracing::info;

#[tokio::main]
async fn main() {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Chain Example ---");

  // 1. Build a chain: two middlewares feeding the context, a resolver
  //    consuming it, and a transformer shaping the wire payload.
  let handler = Chain::new()
    .middleware(|req, _sink, _ctx| async move {
      let name = req.read().get(reqchain::Location::Query)["name"].clone();
      Ok(json!({ "name": name }))
    })
    .middleware(|_req, _sink, ctx| async move {
      let name = ctx.read().get("name").cloned().unwrap_or(Value::Null);
      info!(?name, "greeting middleware saw the context");
      Ok(json!({ "greeting": format!("hello, {}", name.as_str().unwrap_or("stranger")) }))
    })
    .resolver(|_req, _sink, ctx| async move {
      Ok(ctx.read().get("greeting").cloned().unwrap_or(Value::Null))
    })
    .transformer(|greeting, _sink| async move { Ok(Some(json!({ "data": greeting }))) })
    .build();

  // 2. Per request, the host supplies the request locations and a sink.
  let req = Shared::new(Request::default().with_query(json!({"name": "ada"})));
  let response = BufferedResponse::new();
  let delegate: Delegate = Box::new(|err| eprintln!("host fallback: {err}"));

  // 3. Drive the exchange.
  handler.handle(req, response.clone(), delegate).await;

  let written = response.snapshot().expect("chain always writes on the success path");
  info!(status = written.status, body = ?written.body, "chain responded");
}
