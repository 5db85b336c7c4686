//! meetings CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use meetings_core::{TracingConfig, init_tracing};

use meetings_cli::cli::{Cli, Command, ConfigAction};
use meetings_cli::commands;
use meetings_cli::config::ClientConfig;
use meetings_cli::error::{ClientError, ClientResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config)?,
        None => ClientConfig::load().map_err(ClientError::Config)?,
    };

    match cli.command {
        Command::Login {
            tenant,
            client_id,
            scopes,
            timeout,
        } => {
            let options = commands::login::LoginOptions {
                tenant,
                client_id,
                scopes,
                timeout,
            };
            commands::login::login(options, &config).await
        }
        Command::Events { token, action } => commands::events::run(token, action, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
