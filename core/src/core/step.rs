// reqchain/src/core/step.rs

//! Defines the uniform shape of a single step within a chain.

use crate::core::context::Context;
use crate::core::request::Request;
use crate::core::response::ResponseSink;
use crate::core::shared::Shared;
use crate::error::ChainError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future type used for all stored chain callables.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Type alias for a chain step.
///
/// A step is an asynchronous function over the shared request, the response
/// sink, and the shared context. Its `Ok` value is a context contribution:
/// an object is merged into the context, anything else (conventionally
/// `Value::Null`) contributes nothing. Validators, middlewares, and
/// passthrough middlewares are all normalized to this shape at registration.
pub type StepFn =
  Arc<dyn Fn(Shared<Request>, Arc<dyn ResponseSink>, Shared<Context>) -> BoxFuture<Result<Value, ChainError>> + Send + Sync>;

/// Definition of a registered step: the callable plus a diagnostic label
/// (`validate:params`, `middleware#2`, ...) used in tracing spans.
#[derive(Clone)]
pub struct StepDef {
  pub label: String,
  pub run: StepFn,
}

// StepFn (Arc<dyn Fn...>) doesn't implement Debug; show the label only.
impl std::fmt::Debug for StepDef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef").field("label", &self.label).finish()
  }
}
