//! Shared plumbing for Handin services: health handlers, tracing setup,
//! request-id middleware, and timestamp serialization helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
