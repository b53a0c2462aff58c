// src/lib.rs

//! reqchain: an ASYNC, strongly-ordered request-processing chain for Rust.
//!
//! reqchain composes an ordered sequence of steps — input validators,
//! user-supplied middlewares, a single resolver, and an optional response
//! transformer — into one unit that handles an inbound request-response
//! exchange:
//!  - Steps run strictly in registration order, each fully settling before
//!    the next begins.
//!  - An accumulating JSON context is threaded through the chain; each step
//!    may contribute keys (last-write-wins) for later steps and the resolver.
//!  - A step writing the response directly ends the chain early; a raised
//!    error short-circuits to the error-dispatch procedure.
//!  - Validation failures and application errors are answered with a
//!    structured JSON body; anything else is delegated to the host's own
//!    error handling, untouched.
//!  - Exactly one terminal action per execution, no matter how many steps
//!    ran or failed.
//!
//! The transport (sockets, routing, header parsing) and the schema engine's
//! validation semantics live outside this crate; reqchain consumes a sink
//! abstraction and a parse contract.

// Declare modules according to the planned structure
pub mod core;
pub mod chain;
pub mod validate;
pub mod error;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::context::Context;
pub use crate::core::request::{Location, Request};
pub use crate::core::response::{status_text, BufferedResponse, Payload, ResponseBody, ResponseSink, WrittenResponse};
pub use crate::core::shared::Shared;
pub use crate::core::step::{BoxFuture, StepDef, StepFn};

// The chain builder and the handler it produces
pub use crate::chain::definition::{Chain, Delegate, ResolverFn, RouteHandler, TransformerFn};

// The validation-step adapter surface
pub use crate::validate::schema::{schema_fn, Schema, SchemaInput};

pub use crate::error::{ChainError, ChainResult, Issue};

/*
    Core Workflow:
    1. Build a `Chain`, registering validators / middlewares in the order
       they must run, then `.resolver(..)` (required) and optionally
       `.transformer(..)`.
    2. `chain.build()` yields a cloneable `RouteHandler`.
    3. Per request, the host constructs a `Shared<Request>` from the four
       locations and a `ResponseSink` over its connection, then calls
       `handler.handle(req, sink, delegate).await`.
    4. The delegate is the host's next-in-line error handler; it is invoked
       exactly once, and only for errors the chain does not classify.
*/
