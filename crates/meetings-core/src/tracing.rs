//! Log output for the `meetings` binaries.
//!
//! Diagnostics always go to standard error. Standard output belongs to
//! command results, and `meetings login` prints nothing there but the
//! access token.
//!
//! `RUST_LOG` replaces the default filter when it is set.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crates whose log output is enabled by the default filter.
const WORKSPACE_TARGETS: &[&str] = &[
    "meetings_core",
    "meetings_auth",
    "meetings_graph",
    "meetings_cli",
];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How much the CLI says about itself on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level applied to the workspace crates when `RUST_LOG` is unset.
    pub default_level: Level,
    /// Prefix each line with its target and source location.
    pub verbose: bool,
}

impl TracingConfig {
    /// Warnings and errors only, one bare line each.
    pub fn cli() -> Self {
        Self {
            default_level: Level::WARN,
            verbose: false,
        }
    }

    /// Everything down to `debug`, with targets and source locations.
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            verbose: true,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    ///
    /// Only workspace crates are enabled so `--debug` does not drown the
    /// sign-in prompt in HTTP client internals.
    pub fn default_directive(&self) -> String {
        let level = self.default_level.to_string().to_lowercase();
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.default_directive())?),
        }
    }
}

/// Installs the global subscriber. Call once, before any command runs.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set or the filter
/// directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_writer(std::io::stderr)
        .with_target(config.verbose)
        .with_file(config.verbose)
        .with_line_number(config.verbose);

    let subscriber = tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
