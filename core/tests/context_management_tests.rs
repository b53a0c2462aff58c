// tests/context_management_tests.rs
mod common;

use common::*;
use reqchain::{BufferedResponse, Chain, Request, Shared};
use serde_json::{json, Value};

fn empty_request() -> Shared<Request> {
  Shared::new(Request::default())
}

#[tokio::test]
async fn context_accumulates_object_returns_last_write_wins() {
  setup_tracing();
  let handler = Chain::new()
    .middleware(|_req, _sink, _ctx| async { Ok(json!({"a": 1, "b": "first"})) })
    .middleware(|_req, _sink, _ctx| async { Ok(json!({"b": "second", "c": true})) })
    .resolver(|_req, _sink, ctx| async move { Ok(ctx.read().to_value()) })
    .transformer(|resolved, _sink| async move { Ok(Some(resolved)) })
    .build();

  let response = BufferedResponse::new();
  handler.handle(empty_request(), response.clone(), unreachable_delegate()).await;

  assert_eq!(
    response.snapshot().unwrap().json(),
    Some(&json!({"a": 1, "b": "second", "c": true}))
  );
}

#[tokio::test]
async fn non_object_returns_leave_the_context_unchanged() {
  setup_tracing();
  let handler = Chain::new()
    .middleware(|_req, _sink, _ctx| async { Ok(json!({"kept": "yes"})) })
    .middleware(|_req, _sink, _ctx| async { Ok(Value::Null) })
    .middleware(|_req, _sink, _ctx| async { Ok(json!([1, 2, 3])) })
    .middleware(|_req, _sink, _ctx| async { Ok(json!("a string")) })
    .middleware(|_req, _sink, _ctx| async { Ok(json!(42)) })
    .resolver(|_req, _sink, ctx| async move { Ok(ctx.read().to_value()) })
    .transformer(|resolved, _sink| async move { Ok(Some(resolved)) })
    .build();

  let response = BufferedResponse::new();
  handler.handle(empty_request(), response.clone(), unreachable_delegate()).await;

  assert_eq!(response.snapshot().unwrap().json(), Some(&json!({"kept": "yes"})));
}

#[tokio::test]
async fn passthrough_steps_contribute_nothing() {
  setup_tracing();
  let handler = Chain::new()
    .middleware(|_req, _sink, _ctx| async { Ok(json!({"from": "middleware"})) })
    .passthrough(|_req, _sink| async { Ok(()) })
    .resolver(|_req, _sink, ctx| async move { Ok(ctx.read().to_value()) })
    .transformer(|resolved, _sink| async move { Ok(Some(resolved)) })
    .build();

  let response = BufferedResponse::new();
  handler.handle(empty_request(), response.clone(), unreachable_delegate()).await;

  assert_eq!(response.snapshot().unwrap().json(), Some(&json!({"from": "middleware"})));
}

#[tokio::test]
async fn each_execution_starts_with_an_empty_context() {
  setup_tracing();
  let handler = Chain::new()
    .middleware(|req, _sink, ctx| async move {
      // A leftover key from a previous run would be visible here.
      assert!(ctx.read().is_empty(), "context leaked across executions");
      let tag = req.read().get(reqchain::Location::Query)["tag"].clone();
      Ok(json!({ "tag": tag }))
    })
    .resolver(|_req, _sink, ctx| async move { Ok(ctx.read().to_value()) })
    .transformer(|resolved, _sink| async move { Ok(Some(resolved)) })
    .build();

  for tag in ["one", "two"] {
    let response = BufferedResponse::new();
    let req = Shared::new(Request::default().with_query(json!({ "tag": tag })));
    handler.handle(req, response.clone(), unreachable_delegate()).await;
    assert_eq!(response.snapshot().unwrap().json(), Some(&json!({ "tag": tag })));
  }
}

#[tokio::test]
async fn later_steps_observe_earlier_contributions() {
  setup_tracing();
  let handler = Chain::new()
    .middleware(|_req, _sink, _ctx| async { Ok(json!({"user_id": 42})) })
    .middleware(|_req, _sink, ctx| async move {
      let user_id = ctx.read().get("user_id").cloned().unwrap_or(Value::Null);
      Ok(json!({ "greeting": format!("hello #{user_id}") }))
    })
    .resolver(|_req, _sink, ctx| async move { Ok(ctx.read().get("greeting").cloned().unwrap_or(Value::Null)) })
    .transformer(|resolved, _sink| async move { Ok(Some(json!({ "data": resolved }))) })
    .build();

  let response = BufferedResponse::new();
  handler.handle(empty_request(), response.clone(), unreachable_delegate()).await;

  assert_eq!(
    response.snapshot().unwrap().json(),
    Some(&json!({"data": "hello #42"}))
  );
}
