//! Command-line interface for meetings-as-code.
//!
//! `meetings login` runs the device-authorization flow and prints the access
//! token; `meetings events` manages calendar events with such a token.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
