// reqchain/src/validate/mod.rs

//! The validation-step adapter: the consumed schema contract, the two
//! accepted validator input forms, and the step wrapper itself.

pub mod adapter;
pub mod schema;

pub use schema::{schema_fn, Schema, SchemaInput};
