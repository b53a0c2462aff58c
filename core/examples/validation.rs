// reqchain/examples/validation.rs

use reqchain::{schema_fn, BufferedResponse, Chain, Delegate, Issue, Location, Request, Shared};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

// A stand-in for a real schema engine: non-empty strings only.
fn non_empty_string() -> Arc<dyn reqchain::Schema> {
  schema_fn(|value: &Value| match value.as_str() {
    Some(s) if !s.is_empty() => Ok(value.clone()),
    _ => Err(vec![Issue::new("expected a non-empty string", vec![])]),
  })
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Validation Example ---");

  // Field-map validator input: synthesized into one combined schema at
  // registration time.
  let handler = Chain::new()
    .validator(Location::Body, [("username", non_empty_string()), ("password", non_empty_string())])
    .resolver(|req, _sink, _ctx| async move {
      let username = req.read().get(Location::Body)["username"].clone();
      Ok(json!({ "username": username }))
    })
    .transformer(|user, _sink| async move { Ok(Some(json!({ "data": user }))) })
    .build();

  let delegate = || -> Delegate { Box::new(|err| eprintln!("host fallback: {err}")) };

  // A valid body passes through and resolves.
  let response = BufferedResponse::new();
  let ok_req = Shared::new(Request::default().with_body(json!({"username": "ada", "password": "hunter2"})));
  handler.handle(ok_req, response.clone(), delegate()).await;
  info!(response = ?response.snapshot(), "valid body");

  // A rejected body is answered with 400 and field-level diagnostics;
  // the resolver never runs.
  let response = BufferedResponse::new();
  let bad_req = Shared::new(Request::default().with_body(json!({"username": "", "password": 42})));
  handler.handle(bad_req, response.clone(), delegate()).await;
  info!(response = ?response.snapshot(), "rejected body");
}
