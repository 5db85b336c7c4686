//! Shared plumbing for the meetings-as-code crates.

pub mod tracing;

pub use tracing::{TracingConfig, TracingError, init_tracing};
