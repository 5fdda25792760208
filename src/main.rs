mod api;
mod bulk;
mod cli;
mod commands;
mod config;
mod interactive;
mod logging;
mod server;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use self::api::PorkbunClient;
use self::cli::{Cli, Command};
use self::config::{default_credentials_path, resolve_credentials};
use self::interactive::Capability;
use self::logging::Logger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    #[cfg(feature = "dotenv")]
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = Logger::new(cli.log_level).init() {
        eprintln!("Failed to initialize logging: {err}");
    }

    let capability = Capability::detect();
    log::trace!("Terminal capability: {capability:?}");

    match run(cli, capability).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli, capability: Capability) -> eyre::Result<()> {
    let config_path = cli.config.unwrap_or_else(default_credentials_path);
    log::debug!("Using credentials file {}", config_path.display());

    match cli.command {
        Command::Configure => commands::configure(&config_path, &mut io::stdin().lock()).await,
        Command::Serve => {
            let client = connect(&config_path, true).await?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            server::serve(&client, stdin, tokio::io::stdout()).await
        },
        Command::Interactive => {
            let mut prompter = capability.prompter()?;
            let client = connect(&config_path, false).await?;
            interactive::run(&client, &mut prompter).await
        },
        Command::Ping => commands::ping(&connect(&config_path, false).await?).await,
        Command::Domain(cmd) => {
            let client = connect(&config_path, false).await?;
            commands::domain::run(cmd, &client, &mut io::stdin().lock()).await
        },
        Command::Dns(cmd) => {
            let client = connect(&config_path, false).await?;
            commands::dns::run(cmd, &client, &mut io::stdin().lock()).await
        },
        Command::Url(cmd) => commands::url::run(cmd, &connect(&config_path, false).await?).await,
        Command::Bulk(cmd) => bulk::run(cmd, &connect(&config_path, false).await?).await,
    }
}

/// Builds the one API client this run will use. Missing credentials are not an error yet: they are reported by the
/// first call that needs them.
async fn connect(config_path: &Path, prefer_env: bool) -> eyre::Result<PorkbunClient> {
    let credentials = resolve_credentials(config_path, prefer_env).await;
    Ok(PorkbunClient::new(credentials)?)
}

/// Retrieves an environment variable, also checking `.env` files when the `dotenv` feature is enabled. Empty values
/// count as unset.
pub fn get_var(key: &str) -> Option<String> {
    #[cfg(feature = "dotenv")]
    let value = dotenvy::var(key).ok();
    #[cfg(not(feature = "dotenv"))]
    let value = std::env::var(key).ok();

    value.filter(|v| !v.is_empty())
}
