// reqchain/src/validate/adapter.rs

//! Wraps a normalized schema for one request location into a uniform step.

use crate::core::request::Location;
use crate::core::step::StepFn;
use crate::error::{ChainError, Issue};
use crate::validate::schema::Schema;
use serde_json::Value;
use std::sync::Arc;
use tracing::{event, Level};

/// Builds the step that validates `location` against `schema`.
///
/// The step reads the location off the request; a non-object value there is
/// a malformed request and fails before the schema is consulted. On success
/// the location is replaced with the parsed value, so every later step and
/// the resolver see validated data; the step itself contributes nothing to
/// the context.
pub(crate) fn validator_step(location: Location, schema: Arc<dyn Schema>) -> StepFn {
  Arc::new(move |req, _sink, _ctx| {
    let schema = Arc::clone(&schema);
    Box::pin(async move {
      let value = req.read().get(location).clone();

      if !value.is_object() {
        event!(Level::DEBUG, %location, "location is not object-shaped, rejecting as malformed");
        return Err(ChainError::validation(
          location,
          vec![Issue::new("expected an object", vec![])],
        ));
      }

      match schema.parse(&value) {
        Ok(parsed) => {
          req.write().set(location, parsed);
          Ok(Value::Null)
        }
        Err(issues) => {
          event!(Level::DEBUG, %location, issue_count = issues.len(), "schema rejected location");
          Err(ChainError::validation(location, issues))
        }
      }
    })
  })
}
