// reqchain/examples/error_handling.rs

use reqchain::{BufferedResponse, Chain, ChainError, Delegate, Request, Shared};
use serde_json::{json, Value};
use tracing::info;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Error Handling Example ---");

  // An authorization middleware raising an intentional halt, and a resolver
  // that would fail unexpectedly if it ever ran without a token.
  let handler = Chain::new()
    .middleware(|req, _sink, _ctx| async move {
      let token = req.read().get(reqchain::Location::Headers)["authorization"].clone();
      if token.is_null() {
        // Class 2: explicit application error, answered by the chain.
        return Err(ChainError::application(403, "denied"));
      }
      Ok(json!({ "token": token }))
    })
    .resolver(|_req, _sink, ctx| async move {
      let token = ctx.read().get("token").cloned();
      match token {
        Some(token) => Ok(json!({ "session": token })),
        // Class 3: unclassified, delegated to the host untouched.
        None => Err(anyhow::anyhow!("token middleware did not run").into()),
      }
    })
    .transformer(|session, _sink| async move { Ok(Some(json!({ "data": session }))) })
    .build();

  let delegate = || -> Delegate { Box::new(|err| eprintln!("host fallback answers 500: {err}")) };

  // Denied: the chain answers 403 {"errors":["denied"],"type":"Forbidden"}.
  let response = BufferedResponse::new();
  let anonymous = Shared::new(Request::default());
  handler.handle(anonymous, response.clone(), delegate()).await;
  info!(response = ?response.snapshot(), "anonymous request");

  // Authorized: success path.
  let response = BufferedResponse::new();
  let authorized = Shared::new(Request::default().with_headers(json!({"Authorization": "bearer x"})));
  handler.handle(authorized, response.clone(), delegate()).await;
  info!(response = ?response.snapshot(), "authorized request");

  // Unexpected resolver failure: nothing written by the chain, the host's
  // fallback owns the outcome.
  let failing = Chain::new()
    .resolver(|_req, _sink, _ctx| async { Err::<Value, _>(anyhow::anyhow!("database exploded").into()) })
    .build();
  let response = BufferedResponse::new();
  failing.handle(Shared::new(Request::default()), response.clone(), delegate()).await;
  info!(wrote = response.snapshot().is_some(), "unexpected failure leaves the write to the host");
}
