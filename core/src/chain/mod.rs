// reqchain/src/chain/mod.rs

//! Defines the `Chain` builder, the `RouteHandler` it produces, and the
//! execution logic that drives one request through the chain.

pub mod definition;
pub mod execution;

// Re-export the main chain types
pub use definition::{Chain, Delegate, ResolverFn, RouteHandler, TransformerFn};
