// reqchain/src/core/request.rs

//! The request surface the chain operates on: four named locations, each a
//! JSON value supplied by the host transport. Reading the wire, parsing
//! headers, and route matching all happen outside this crate.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// The four fixed validation targets on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
  Body,
  Query,
  Headers,
  Params,
}

impl Location {
  pub fn as_str(&self) -> &'static str {
    match self {
      Location::Body => "body",
      Location::Query => "query",
      Location::Headers => "headers",
      Location::Params => "params",
    }
  }
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One inbound request, reduced to its four validatable locations.
///
/// Validators replace a location with the schema's parsed (possibly
/// coerced) value, so later steps and the resolver observe validated data.
#[derive(Debug, Clone, Default)]
pub struct Request {
  body: Value,
  query: Value,
  headers: Value,
  params: Value,
}

impl Request {
  /// Builds a request from the four locations.
  ///
  /// Header keys are normalized to lower case here, which is what makes
  /// header validation effectively case-insensitive: validator keys for the
  /// headers location must be declared lower-case.
  pub fn new(body: Value, query: Value, headers: Value, params: Value) -> Self {
    Self {
      body,
      query,
      headers: normalize_header_keys(headers),
      params,
    }
  }

  pub fn get(&self, location: Location) -> &Value {
    match location {
      Location::Body => &self.body,
      Location::Query => &self.query,
      Location::Headers => &self.headers,
      Location::Params => &self.params,
    }
  }

  pub fn set(&mut self, location: Location, value: Value) {
    let value = match location {
      Location::Headers => normalize_header_keys(value),
      _ => value,
    };
    match location {
      Location::Body => self.body = value,
      Location::Query => self.query = value,
      Location::Headers => self.headers = value,
      Location::Params => self.params = value,
    }
  }

  // Fluent constructors, mainly for hosts and tests building requests by hand.

  pub fn with_body(mut self, body: Value) -> Self {
    self.body = body;
    self
  }

  pub fn with_query(mut self, query: Value) -> Self {
    self.query = query;
    self
  }

  pub fn with_headers(mut self, headers: Value) -> Self {
    self.headers = normalize_header_keys(headers);
    self
  }

  pub fn with_params(mut self, params: Value) -> Self {
    self.params = params;
    self
  }
}

fn normalize_header_keys(headers: Value) -> Value {
  match headers {
    Value::Object(entries) => {
      let mut lowered = Map::with_capacity(entries.len());
      for (key, value) in entries {
        lowered.insert(key.to_ascii_lowercase(), value);
      }
      Value::Object(lowered)
    }
    other => other,
  }
}
