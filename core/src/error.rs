// reqchain/src/error.rs

use serde::Serialize;
use thiserror::Error;

use crate::core::request::Location;

/// One field-level diagnostic produced by schema validation.
///
/// `path` is the sequence of keys/indices leading to the offending value
/// inside the validated location (empty for the location itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
  pub message: String,
  pub path: Vec<String>,
}

impl Issue {
  pub fn new(message: impl Into<String>, path: Vec<String>) -> Self {
    Self {
      message: message.into(),
      path,
    }
  }

  /// Prepends a key to the issue path. Used when a field-map schema
  /// re-roots a field schema's issues under the field name.
  pub(crate) fn prefixed(mut self, key: &str) -> Self {
    self.path.insert(0, key.to_string());
    self
  }
}

/// The three error classes a chain execution can terminate with.
///
/// Classification priority is fixed: validation failures, then application
/// errors, then everything else. The first two are answered by the chain
/// itself with a structured JSON body; `Unexpected` is always handed to the
/// host's delegate unmodified.
#[derive(Debug, Error)]
pub enum ChainError {
  /// Malformed or schema-rejected input at one of the four request locations.
  /// Always reported as HTTP 400 with field-level diagnostics.
  #[error("validation failed for {location}: {} issue(s)", issues.len())]
  Validation { location: Location, issues: Vec<Issue> },

  /// Intentionally raised by a step, resolver, or transformer author to halt
  /// processing with a chosen status code (e.g. an authorization denial).
  #[error("{message}")]
  Application { status: u16, message: String },

  /// Anything else: programming errors, failed I/O inside a step, and other
  /// unexpected throws. Never given a chain-authored body.
  #[error(transparent)]
  Unexpected(#[from] anyhow::Error),
}

impl ChainError {
  /// Shorthand for raising an application error from a step.
  pub fn application(status: u16, message: impl Into<String>) -> Self {
    ChainError::Application {
      status,
      message: message.into(),
    }
  }

  pub fn validation(location: Location, issues: Vec<Issue>) -> Self {
    ChainError::Validation { location, issues }
  }
}

pub type ChainResult<T, E = ChainError> = std::result::Result<T, E>;
