// reqchain/src/chain/execution.rs

//! Contains `ChainInner::dispatch`, responsible for driving one request
//! through the registered steps, the resolver, and the optional transformer,
//! plus the error-dispatch procedure that classifies a terminating error.
//!
//! Exactly one terminal action occurs per dispatch: a write performed by a
//! step, by the resolver, by the transformer, by error dispatch, or one
//! delegation to the host. Errors are never retried, and the chain never
//! logs them itself; classification events here stay at DEBUG/TRACE.

use crate::chain::definition::{ChainInner, Delegate};
use crate::core::context::Context;
use crate::core::request::Request;
use crate::core::response::{status_text, ResponseSink};
use crate::core::shared::Shared;
use crate::error::ChainError;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{event, instrument, span, Instrument, Level};

impl ChainInner {
  #[instrument(
        name = "Chain::dispatch",
        skip_all,
        fields(
            num_steps = self.steps.len(),
            transformer_present = self.transformer.is_some(),
        )
    )]
  pub(crate) async fn dispatch(&self, req: Shared<Request>, sink: Arc<dyn ResponseSink>, delegate: Delegate) {
    event!(Level::DEBUG, "chain execution starting.");

    // Context is exclusively owned by this execution.
    let ctx = Shared::new(Context::new());

    for (step_idx, step) in self.steps.iter().enumerate() {
      let step_span = span!(Level::DEBUG, "chain_step", label = step.label.as_str(), step_index = step_idx);

      // Instrument rather than enter(): the guard must not live across the
      // await, and the dispatch future has to stay Send for spawning hosts.
      match (step.run)(req.clone(), sink.clone(), ctx.clone())
        .instrument(step_span)
        .await
      {
        Ok(patch) => {
          ctx.write().merge(&patch);
          if sink.headers_sent() {
            // Normal, non-error termination: a step fully handled the
            // response. Remaining steps, resolver, and transformer are
            // skipped and nothing else is written.
            event!(Level::DEBUG, "response already written by a step, stopping early.");
            return;
          }
          event!(Level::TRACE, context_keys = ctx.read().len(), "step settled.");
        }
        Err(err) => {
          event!(Level::DEBUG, "step terminated the chain.");
          return finish_with_error(err, sink, delegate).await;
        }
      }
    }

    event!(Level::DEBUG, "steps exhausted, invoking resolver.");
    let resolved = match (self.resolver)(req.clone(), sink.clone(), ctx.clone()).await {
      Ok(resolved) => resolved,
      Err(err) => {
        event!(Level::DEBUG, "resolver terminated the chain.");
        return finish_with_error(err, sink, delegate).await;
      }
    };

    let transformer = match &self.transformer {
      Some(transformer) => transformer,
      None => {
        // Without a transformer the resolver owns the response; the chain
        // performs no further write.
        event!(Level::DEBUG, "no transformer registered, resolver owns the response.");
        return;
      }
    };

    match transformer(resolved, sink.clone()).await {
      Ok(Some(payload)) => {
        if payload.is_object() {
          sink.send_json(200, payload).await;
        } else {
          sink.send_raw(200, raw_body(payload)).await;
        }
      }
      Ok(None) => {
        event!(Level::DEBUG, "transformer wrote the response directly.");
      }
      Err(err) => {
        event!(Level::DEBUG, "transformer terminated the chain.");
        finish_with_error(err, sink, delegate).await;
      }
    }
  }
}

/// Classifies the terminating error and produces the one externally
/// observable outcome: a 400 with field diagnostics, the application error's
/// own status and message, or a single delegation to the host.
async fn finish_with_error(err: ChainError, sink: Arc<dyn ResponseSink>, delegate: Delegate) {
  // A step may have written the response before erroring; the one terminal
  // write already happened, so the class-1/2 bodies are suppressed here.
  // Unclassified errors are still delegated: the host owns that outcome.
  if sink.headers_sent() && !matches!(err, ChainError::Unexpected(_)) {
    event!(Level::DEBUG, "response already written, suppressing error body.");
    return;
  }
  match err {
    ChainError::Validation { location, issues } => {
      event!(Level::DEBUG, %location, issue_count = issues.len(), "answering validation failure.");
      let body = json!({
        "errors": issues,
        "location": location,
        "type": status_text(400),
      });
      sink.send_json(400, body).await;
    }
    ChainError::Application { status, message } => {
      event!(Level::DEBUG, status, "answering application error.");
      let mut body = Map::new();
      body.insert("errors".to_string(), json!([message]));
      // A status outside the fixed table has no status text; the key is
      // omitted rather than written as null.
      if let Some(text) = status_text(status) {
        body.insert("type".to_string(), json!(text));
      }
      sink.send_json(status, Value::Object(body)).await;
    }
    ChainError::Unexpected(source) => {
      event!(Level::DEBUG, "delegating unclassified error to the host.");
      delegate(source);
    }
  }
}

/// Non-object transformer output is sent as a raw body: strings verbatim,
/// everything else as its JSON text.
fn raw_body(value: Value) -> String {
  match value {
    Value::String(s) => s,
    other => other.to_string(),
  }
}
