//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// meetings - Sign in with a device code and manage calendar events
#[derive(Debug, Parser)]
#[command(name = "meetings")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MEETINGS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with the device-authorization flow and print the access token
    Login {
        /// Directory tenant (overrides config)
        #[arg(long)]
        tenant: Option<String>,

        /// Application (client) ID
        #[arg(long, env = "MICROSOFT_APP_CLIENT_ID")]
        client_id: Option<String>,

        /// Scope to request (can be repeated)
        #[arg(long = "scope", action = clap::ArgAction::Append)]
        scopes: Vec<String>,

        /// Give up after this many seconds (0 waits until the code expires)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Calendar event commands
    Events {
        /// Bearer token for the calendar API
        #[arg(long, env = "GRAPH_API_TOKEN", hide_env_values = true)]
        token: String,

        #[command(subcommand)]
        action: EventsAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List events of the signed-in user
    List,

    /// Show a single event
    Get {
        /// Event ID
        id: String,
    },

    /// Create an event
    Create {
        #[command(flatten)]
        fields: EventFields,
    },

    /// Update fields of an existing event
    Update {
        /// Event ID
        id: String,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

/// Event fields accepted by `create` and `update`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EventFields {
    /// Event subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Start date-time, e.g. 2024-03-15T09:00:00
    #[arg(long)]
    pub start: Option<String>,

    /// End date-time, e.g. 2024-03-15T09:30:00
    #[arg(long)]
    pub end: Option<String>,

    /// Time zone for start and end
    #[arg(long, default_value = "UTC")]
    pub time_zone: String,

    /// Location display name
    #[arg(long)]
    pub location: Option<String>,

    /// Required attendee as "Name <address>" or a bare address (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub attendee: Vec<String>,

    /// Optional attendee as "Name <address>" or a bare address (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub optional_attendee: Vec<String>,

    /// Free/busy status, e.g. busy or free
    #[arg(long)]
    pub show_as: Option<String>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
