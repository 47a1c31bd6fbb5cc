//! `deskmail` - export a help-desk mail store to `.eml` files.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod logging;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use cli::{Cli, Command};
use settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_file = cli.log_file().or_else(|| settings.log_file.clone());
    let _guard = match logging::init(cli.verbose, log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    debug!(
        "Settings loaded from {}",
        cli.config
            .clone()
            .unwrap_or_else(Settings::default_path)
            .display()
    );

    match run(&cli, &settings).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<ExitCode> {
    let authorizer = commands::authorizer(settings.registration_key(cli.key.as_deref()));

    match &cli.command {
        Command::Export(args) => commands::export(args, settings, authorizer.as_ref()).await,
        Command::Totals { conn, json } => {
            commands::totals(conn, *json, settings, authorizer.as_ref()).await
        }
        Command::DeleteTicket { id, hard, conn } => {
            commands::delete_ticket(*id, *hard, conn, settings, authorizer.as_ref()).await
        }
    }
}
