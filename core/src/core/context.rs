// reqchain/src/core/context.rs

//! The accumulating key-value state threaded through one chain execution.

use serde_json::{Map, Value};

/// String-keyed JSON state owned by a single execution of a chain.
///
/// Starts empty. After each step, an object-shaped step return is merged in
/// last-write-wins per key; any other return shape (`null`, arrays,
/// primitives) leaves the context unchanged. Never shared across executions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context(Map<String, Value>);

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  /// Merges an object-shaped patch into the context, key by key, with the
  /// patch winning on conflicts. Non-object patches are a no-op.
  pub fn merge(&mut self, patch: &Value) {
    if let Value::Object(entries) = patch {
      for (key, value) in entries {
        self.0.insert(key.clone(), value.clone());
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The context as a JSON object value (a copy).
  pub fn to_value(&self) -> Value {
    Value::Object(self.0.clone())
  }
}
