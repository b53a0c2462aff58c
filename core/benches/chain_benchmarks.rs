use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reqchain::{schema_fn, BufferedResponse, Chain, Delegate, Issue, Location, Request, RouteHandler, Shared};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion

fn noop_delegate() -> Delegate {
  Box::new(|_err| {})
}

fn non_empty_string() -> Arc<dyn reqchain::Schema> {
  schema_fn(|value: &Value| match value.as_str() {
    Some(s) if !s.is_empty() => Ok(value.clone()),
    _ => Err(vec![Issue::new("expected a non-empty string", vec![])]),
  })
}

/// A chain of `num_steps` context-contributing middlewares plus a resolver
/// and transformer, roughly the shape of a typical authenticated route.
fn build_chain(num_steps: usize) -> RouteHandler {
  let mut chain = Chain::new();
  for i in 0..num_steps {
    chain = chain.middleware(move |_req, _sink, _ctx| async move { Ok(json!({ (format!("key_{i}")): i })) });
  }
  chain
    .resolver(|_req, _sink, ctx| async move { Ok(ctx.read().to_value()) })
    .transformer(|resolved, _sink| async move { Ok(Some(json!({ "data": resolved }))) })
    .build()
}

fn bench_dispatch_by_chain_length(c: &mut Criterion) {
  let mut group = c.benchmark_group("ChainDispatch");
  let rt = Runtime::new().unwrap();

  for num_steps in [1usize, 5, 10].iter() {
    let handler = build_chain(*num_steps);
    group.throughput(Throughput::Elements(*num_steps as u64));
    group.bench_with_input(BenchmarkId::from_parameter(num_steps), num_steps, |b, _| {
      b.to_async(&rt).iter(|| {
        let handler = handler.clone();
        async move {
          let response = BufferedResponse::new();
          handler.handle(Shared::new(Request::default()), response, noop_delegate()).await;
        }
      });
    });
  }
  group.finish();
}

fn bench_validator_pass_and_fail(c: &mut Criterion) {
  let mut group = c.benchmark_group("ValidatorStep");
  let rt = Runtime::new().unwrap();

  let handler = Chain::new()
    .validator(Location::Body, [("username", non_empty_string()), ("password", non_empty_string())])
    .resolver(|_req, _sink, _ctx| async { Ok(Value::Null) })
    .build();

  let passing = json!({"username": "ada", "password": "hunter2"});
  let failing = json!({"username": "", "password": 42});

  for (label, body) in [("pass", passing), ("fail", failing)] {
    let handler = handler.clone();
    group.bench_function(label, move |b| {
      let handler = handler.clone();
      let body = body.clone();
      b.to_async(&rt).iter(move || {
        let handler = handler.clone();
        let body = body.clone();
        async move {
          let response = BufferedResponse::new();
          let req = Shared::new(Request::default().with_body(body));
          handler.handle(req, response, noop_delegate()).await;
        }
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_dispatch_by_chain_length, bench_validator_pass_and_fail);
criterion_main!(benches);
