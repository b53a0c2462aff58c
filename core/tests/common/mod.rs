// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqchain::{schema_fn, Delegate, Issue, Schema};
use serde_json::json;
use std::sync::Arc;
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Host fallback stand-ins for the delegate (proceed signal) ---

/// Records what the host's generic error handler would have done. In these
/// tests the fallback always answers 500 with the error's message, like a
/// default catch-all error middleware.
#[derive(Debug, Default)]
pub struct FallbackHandler {
  response: Mutex<Option<(u16, String)>>,
}

impl FallbackHandler {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn delegate(self: &Arc<Self>) -> Delegate {
    let fallback = Arc::clone(self);
    Box::new(move |err| {
      *fallback.response.lock() = Some((500, err.to_string()));
    })
  }

  pub fn was_called(&self) -> bool {
    self.response.lock().is_some()
  }

  pub fn response(&self) -> Option<(u16, String)> {
    self.response.lock().clone()
  }
}

/// A delegate for tests where delegation would be a bug.
pub fn unreachable_delegate() -> Delegate {
  Box::new(|err| panic!("chain delegated unexpectedly: {err}"))
}

// --- Schemas used across the test files ---

/// Accepts any non-empty string, unchanged.
pub fn non_empty_string() -> Arc<dyn Schema> {
  schema_fn(|value| match value.as_str() {
    Some(s) if !s.is_empty() => Ok(value.clone()),
    _ => Err(vec![Issue::new("expected a non-empty string", vec![])]),
  })
}

/// Accepts a canonically formatted UUID string. Rejection message matches
/// the usual schema-engine wording.
pub fn uuid_string() -> Arc<dyn Schema> {
  schema_fn(|value| {
    let ok = value.as_str().is_some_and(is_uuid);
    if ok {
      Ok(value.clone())
    } else {
      Err(vec![Issue::new("Invalid uuid", vec![])])
    }
  })
}

fn is_uuid(s: &str) -> bool {
  let bytes = s.as_bytes();
  if bytes.len() != 36 {
    return false;
  }
  s.char_indices().all(|(i, c)| match i {
    8 | 13 | 18 | 23 => c == '-',
    _ => c.is_ascii_hexdigit(),
  })
}

/// Accepts any string and upper-cases it, to observe schema transforms
/// flowing back into the request.
pub fn upper_casing_string() -> Arc<dyn Schema> {
  schema_fn(|value| match value.as_str() {
    Some(s) => Ok(json!(s.to_uppercase())),
    None => Err(vec![Issue::new("expected a string", vec![])]),
  })
}

#[cfg(test)]
mod sanity {
  use super::*;

  #[test]
  fn uuid_matcher_accepts_canonical_form() {
    assert!(is_uuid("123e4567-e89b-12d3-a456-426614174000"));
    assert!(!is_uuid("not-a-uuid"));
    assert!(!is_uuid("123e4567e89b12d3a456426614174000"));
  }
}
