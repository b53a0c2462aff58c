pub mod context;
pub mod request;
pub mod response;
pub mod shared;
pub mod step;

// Re-export key types for easier access from other modules (and lib.rs)
pub use context::Context;
pub use request::{Location, Request};
pub use response::{status_text, BufferedResponse, Payload, ResponseBody, ResponseSink, WrittenResponse};
pub use shared::Shared;
pub use step::{BoxFuture, StepDef, StepFn};
