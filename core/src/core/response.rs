// reqchain/src/core/response.rs

//! The response-sink abstraction and the fixed status-text table.
//!
//! The sink is the only way the chain touches the outbound side of an
//! exchange. Transports implement it over their own connection type; the
//! in-memory [`BufferedResponse`] ships for tests, benches, and embedding.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Abstraction over writing status and body to the client.
///
/// Writes are terminal: an implementation must ignore any write after the
/// first and report `headers_sent() == true` from then on. The chain checks
/// `headers_sent` after every step and treats it as the early-exit signal.
#[async_trait]
pub trait ResponseSink: Send + Sync {
  /// Whether a response (status/headers/body) has already been written.
  fn headers_sent(&self) -> bool;

  /// Writes `body` serialized as JSON with the given status.
  async fn send_json(&self, status: u16, body: Value);

  /// Writes `body` verbatim with the given status.
  async fn send_raw(&self, status: u16, body: String);
}

/// The body a [`BufferedResponse`] recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
  Json(Value),
  Raw(String),
}

/// One recorded write.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenResponse {
  pub status: u16,
  pub body: ResponseBody,
}

impl WrittenResponse {
  /// The recorded JSON body, if the write was JSON.
  pub fn json(&self) -> Option<&Value> {
    match &self.body {
      ResponseBody::Json(value) => Some(value),
      ResponseBody::Raw(_) => None,
    }
  }
}

/// In-memory `ResponseSink` recording at most one write.
#[derive(Debug, Default)]
pub struct BufferedResponse {
  written: Mutex<Option<WrittenResponse>>,
}

impl BufferedResponse {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// A copy of the recorded write, if any.
  pub fn snapshot(&self) -> Option<WrittenResponse> {
    self.written.lock().clone()
  }

  fn record(&self, status: u16, body: ResponseBody) {
    let mut written = self.written.lock();
    if written.is_none() {
      *written = Some(WrittenResponse { status, body });
    }
    // A second write is a host bug; the first response stands.
  }
}

#[async_trait]
impl ResponseSink for BufferedResponse {
  fn headers_sent(&self) -> bool {
    self.written.lock().is_some()
  }

  async fn send_json(&self, status: u16, body: Value) {
    self.record(status, ResponseBody::Json(body));
  }

  async fn send_raw(&self, status: u16, body: String) {
    self.record(status, ResponseBody::Raw(body));
  }
}

static STATUS_TEXT: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
  HashMap::from([
    (200, "OK"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (500, "Internal Server Error"),
  ])
});

/// Status text for the codes the wire contract names. Codes outside the
/// table yield `None`, and error bodies for them omit the `type` key.
pub fn status_text(status: u16) -> Option<&'static str> {
  STATUS_TEXT.get(&status).copied()
}

/// The conventional `{data, meta}` transformer payload shape.
///
/// `meta` is omitted from the JSON entirely when absent, so
/// `Payload::data(json!({"name": "a"}))` serializes as `{"data":{"name":"a"}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
  pub data: Value,
  pub meta: Option<Value>,
}

impl Payload {
  pub fn data(data: Value) -> Self {
    Self { data, meta: None }
  }

  pub fn with_meta(mut self, meta: Value) -> Self {
    self.meta = Some(meta);
    self
  }

  pub fn into_value(self) -> Value {
    let mut out = Map::with_capacity(2);
    out.insert("data".to_string(), self.data);
    if let Some(meta) = self.meta {
      out.insert("meta".to_string(), meta);
    }
    Value::Object(out)
  }
}

impl From<Payload> for Value {
  fn from(payload: Payload) -> Self {
    payload.into_value()
  }
}
