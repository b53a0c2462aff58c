// reqchain/src/chain/definition.rs

//! Contains the `Chain` builder and the `RouteHandler` it produces.

use crate::core::context::Context;
use crate::core::request::{Location, Request};
use crate::core::response::ResponseSink;
use crate::core::shared::Shared;
use crate::core::step::{BoxFuture, StepDef, StepFn};
use crate::error::ChainError;
use crate::validate::adapter::validator_step;
use crate::validate::schema::SchemaInput;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Type alias for the mandatory terminal resolver.
///
/// Receives the request, the sink, and the final accumulated context.
/// Returns the resolved application data, or writes the response itself and
/// returns `Value::Null`.
pub type ResolverFn =
  Arc<dyn Fn(Shared<Request>, Arc<dyn ResponseSink>, Shared<Context>) -> BoxFuture<Result<Value, ChainError>> + Send + Sync>;

/// Type alias for the optional terminal transformer.
///
/// Receives the resolver's result. `Ok(Some(v))` is written by the chain
/// (JSON for objects, raw otherwise); `Ok(None)` means the transformer wrote
/// the response directly.
pub type TransformerFn =
  Arc<dyn Fn(Value, Arc<dyn ResponseSink>) -> BoxFuture<Result<Option<Value>, ChainError>> + Send + Sync>;

/// The host's proceed signal: the next-in-line error handling mechanism.
/// Invoked exactly once, and only for unclassified errors.
pub type Delegate = Box<dyn FnOnce(anyhow::Error) + Send>;

/// Fluent, value-semantics builder for one request-processing chain.
///
/// Steps are append-only and execute in registration order. A resolver is
/// mandatory before [`Chain::build`]; setting the resolver or transformer
/// twice is a programming error and panics at registration time.
#[derive(Default)]
pub struct Chain {
  pub(crate) steps: Vec<StepDef>,
  pub(crate) resolver: Option<ResolverFn>,
  pub(crate) transformer: Option<TransformerFn>,
}

impl Chain {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a middleware step. An object-shaped `Ok` value is merged into
  /// the context (last-write-wins per key); any other `Ok` value contributes
  /// nothing.
  pub fn middleware<F, Fut>(mut self, handler_fn: F) -> Self
  where
    F: Fn(Shared<Request>, Arc<dyn ResponseSink>, Shared<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ChainError>> + Send + 'static,
  {
    let label = format!("middleware#{}", self.steps.len() + 1);
    let run: StepFn = Arc::new(move |req, sink, ctx| Box::pin(handler_fn(req, sink, ctx)));
    self.steps.push(StepDef { label, run });
    self
  }

  /// Appends a pre-existing external-style middleware as-is: it sees the
  /// request and the sink but never contributes to the context. Completing
  /// without writing a response means "proceed to the next step".
  pub fn passthrough<F, Fut>(mut self, handler_fn: F) -> Self
  where
    F: Fn(Shared<Request>, Arc<dyn ResponseSink>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ChainError>> + Send + 'static,
  {
    let label = format!("passthrough#{}", self.steps.len() + 1);
    let run: StepFn = Arc::new(move |req, sink, _ctx| {
      let fut = handler_fn(req, sink);
      Box::pin(async move { fut.await.map(|_| Value::Null) })
    });
    self.steps.push(StepDef { label, run });
    self
  }

  /// Appends a validator step for one request location.
  ///
  /// Accepts either a whole-location schema or a field-name → field-schema
  /// map; the form is resolved here, once, and the field-map form is
  /// synthesized into a combined schema before the chain ever runs.
  pub fn validator(mut self, location: Location, input: impl Into<SchemaInput>) -> Self {
    let schema = input.into().normalize();
    self.steps.push(StepDef {
      label: format!("validate:{location}"),
      run: validator_step(location, schema),
    });
    self
  }

  /// Sets the mandatory terminal resolver. Exactly one per chain.
  pub fn resolver<F, Fut>(mut self, handler_fn: F) -> Self
  where
    F: Fn(Shared<Request>, Arc<dyn ResponseSink>, Shared<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ChainError>> + Send + 'static,
  {
    if self.resolver.is_some() {
      panic!("reqchain setup error: resolver is already set for this chain.");
    }
    self.resolver = Some(Arc::new(move |req, sink, ctx| Box::pin(handler_fn(req, sink, ctx))));
    self
  }

  /// Sets the optional terminal transformer. At most one per chain.
  pub fn transformer<F, Fut>(mut self, handler_fn: F) -> Self
  where
    F: Fn(Value, Arc<dyn ResponseSink>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Value>, ChainError>> + Send + 'static,
  {
    if self.transformer.is_some() {
      panic!("reqchain setup error: transformer is already set for this chain.");
    }
    self.transformer = Some(Arc::new(move |resolved, sink| Box::pin(handler_fn(resolved, sink))));
    self
  }

  /// Finalizes the chain into a cloneable handler.
  ///
  /// Panics if no resolver was registered; a chain without a resolver is a
  /// setup error, not a runtime condition.
  pub fn build(self) -> RouteHandler {
    let resolver = match self.resolver {
      Some(resolver) => resolver,
      None => panic!("reqchain setup error: a resolver is required before a chain can run."),
    };
    RouteHandler {
      inner: Arc::new(ChainInner {
        steps: self.steps,
        resolver,
        transformer: self.transformer,
      }),
    }
  }
}

impl std::fmt::Debug for Chain {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Chain")
      .field("steps", &self.steps)
      .field("resolver_present", &self.resolver.is_some())
      .field("transformer_present", &self.transformer.is_some())
      .finish()
  }
}

/// The immutable, built form of a chain. Shared by all handler clones.
pub(crate) struct ChainInner {
  pub(crate) steps: Vec<StepDef>,
  pub(crate) resolver: ResolverFn,
  pub(crate) transformer: Option<TransformerFn>,
}

/// The produced artifact: a single callable compatible with a host
/// transport's `(request, responseSink, proceedSignal)` handler shape,
/// suitable for direct registration against a route.
///
/// Cloning is cheap; concurrent `handle` calls are fully independent since
/// the request and context are per-call and the chain itself is immutable.
#[derive(Clone)]
pub struct RouteHandler {
  pub(crate) inner: Arc<ChainInner>,
}

impl RouteHandler {
  /// Drives one request through the chain. See `chain::execution`.
  pub async fn handle(&self, req: Shared<Request>, sink: Arc<dyn ResponseSink>, delegate: Delegate) {
    self.inner.dispatch(req, sink, delegate).await
  }
}

impl std::fmt::Debug for RouteHandler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RouteHandler")
      .field("steps", &self.inner.steps)
      .field("transformer_present", &self.inner.transformer.is_some())
      .finish()
  }
}
