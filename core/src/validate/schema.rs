// reqchain/src/validate/schema.rs

//! The consumed contract of the external schema engine, plus the field-map
//! form of validator input and its synthesized combined schema.

use crate::error::Issue;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The pass/fail/transform contract this crate consumes from a schema engine.
///
/// `parse` either returns the validated value — possibly transformed by the
/// schema (coerced, case-normalized, defaulted) — or the full list of
/// violations found in the input. How validation is performed is entirely
/// the engine's business.
pub trait Schema: Send + Sync {
  fn parse(&self, value: &Value) -> Result<Value, Vec<Issue>>;
}

struct FnSchema<F>(F);

impl<F> Schema for FnSchema<F>
where
  F: Fn(&Value) -> Result<Value, Vec<Issue>> + Send + Sync,
{
  fn parse(&self, value: &Value) -> Result<Value, Vec<Issue>> {
    (self.0)(value)
  }
}

/// Adapts a closure into a [`Schema`], the usual bridge from a host's
/// validation engine.
pub fn schema_fn<F>(f: F) -> Arc<dyn Schema>
where
  F: Fn(&Value) -> Result<Value, Vec<Issue>> + Send + Sync + 'static,
{
  Arc::new(FnSchema(f))
}

/// Validator input: either a pre-built schema for the whole location, or a
/// plain mapping from field name to field schema.
///
/// The two forms are distinguished once, at registration, via the `From`
/// conversions below; [`SchemaInput::normalize`] then resolves the field-map
/// form into one combined object schema so nothing is re-probed per request.
pub enum SchemaInput {
  Whole(Arc<dyn Schema>),
  Fields(Vec<(String, Arc<dyn Schema>)>),
}

impl SchemaInput {
  /// Resolves the input to a single schema for the location.
  pub(crate) fn normalize(self) -> Arc<dyn Schema> {
    match self {
      SchemaInput::Whole(schema) => schema,
      SchemaInput::Fields(fields) => Arc::new(FieldMapSchema { fields }),
    }
  }
}

impl From<Arc<dyn Schema>> for SchemaInput {
  fn from(schema: Arc<dyn Schema>) -> Self {
    SchemaInput::Whole(schema)
  }
}

impl From<Vec<(String, Arc<dyn Schema>)>> for SchemaInput {
  fn from(fields: Vec<(String, Arc<dyn Schema>)>) -> Self {
    SchemaInput::Fields(fields)
  }
}

impl<const N: usize> From<[(&str, Arc<dyn Schema>); N]> for SchemaInput {
  fn from(fields: [(&str, Arc<dyn Schema>); N]) -> Self {
    SchemaInput::Fields(fields.into_iter().map(|(name, schema)| (name.to_string(), schema)).collect())
  }
}

/// Combined schema synthesized from a field map.
///
/// Runs each field schema against the matching key of the input object
/// (missing keys are parsed as `null`, so required-ness stays a field-schema
/// concern), re-roots field issues under the field name, and rebuilds the
/// object with the parsed field values. Unknown keys pass through untouched.
struct FieldMapSchema {
  fields: Vec<(String, Arc<dyn Schema>)>,
}

impl Schema for FieldMapSchema {
  fn parse(&self, value: &Value) -> Result<Value, Vec<Issue>> {
    let entries = match value.as_object() {
      Some(entries) => entries,
      None => return Err(vec![Issue::new("expected an object", vec![])]),
    };

    let mut parsed: Map<String, Value> = entries.clone();
    let mut issues: Vec<Issue> = Vec::new();

    for (name, schema) in &self.fields {
      let field_value = entries.get(name).unwrap_or(&Value::Null);
      match schema.parse(field_value) {
        Ok(field_parsed) => {
          parsed.insert(name.clone(), field_parsed);
        }
        Err(field_issues) => {
          issues.extend(field_issues.into_iter().map(|issue| issue.prefixed(name)));
        }
      }
    }

    if issues.is_empty() {
      Ok(Value::Object(parsed))
    } else {
      Err(issues)
    }
  }
}
