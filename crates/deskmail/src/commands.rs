//! Command handlers.

use std::process::ExitCode;

use anyhow::{Context, Result};
use deskmail_core::{
    AccessMode, AdminRepository, AllowAll, Authorizer, CancellationFlag, RegistrationKey, Totals,
    TracingLog, connect, run_export,
};
use tracing::{info, warn};

use crate::cli::{ConnectionArgs, ExportArgs};
use crate::settings::Settings;

/// Exit status of a run stopped by Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

/// Picks the pre-flight check for this build.
///
/// Builds made with `DESKMAIL_REGISTRATION_KEY` set require a matching key;
/// other builds run unrestricted.
pub fn authorizer(provided: Option<String>) -> Box<dyn Authorizer> {
    match option_env!("DESKMAIL_REGISTRATION_KEY") {
        Some(expected) if !expected.is_empty() => Box::new(RegistrationKey::new(expected, provided)),
        _ => Box::new(AllowAll),
    }
}

/// Runs the export and maps its outcome to an exit status.
pub async fn export(
    args: &ExportArgs,
    settings: &Settings,
    authorizer: &dyn Authorizer,
) -> Result<ExitCode> {
    let options = settings.export_options(args)?;

    let cancel = CancellationFlag::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current message");
            handle.cancel();
        }
    });

    let report = run_export(&options, authorizer, &TracingLog, cancel)
        .await
        .context("Export failed")?;

    if report.cancelled {
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints agent and ticket totals.
pub async fn totals(
    conn: &ConnectionArgs,
    json: bool,
    settings: &Settings,
    authorizer: &dyn Authorizer,
) -> Result<ExitCode> {
    authorizer.authorize().into_result()?;
    let target = settings.connection(conn.connection.as_deref())?;
    let pool = connect(&target, AccessMode::ReadOnly).await?;

    let totals = AdminRepository::new(pool)
        .totals()
        .await
        .context("Failed to read totals")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print!("{}", render_totals(&totals));
    }
    Ok(ExitCode::SUCCESS)
}

/// Soft- or hard-deletes one ticket.
pub async fn delete_ticket(
    id: i64,
    hard: bool,
    conn: &ConnectionArgs,
    settings: &Settings,
    authorizer: &dyn Authorizer,
) -> Result<ExitCode> {
    authorizer.authorize().into_result()?;
    let target = settings.connection(conn.connection.as_deref())?;
    let repo = AdminRepository::new(connect(&target, AccessMode::ReadWrite).await?);

    if hard {
        repo.hard_delete_ticket(id).await?;
        info!("Ticket {id} permanently deleted");
    } else {
        repo.soft_delete_ticket(id).await?;
        info!("Ticket {id} deleted");
    }
    Ok(ExitCode::SUCCESS)
}

fn render_totals(totals: &Totals) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "Active agents: {}", totals.active_agents);
    let _ = writeln!(out, "Open tickets:  {}", totals.open_tickets());
    for status in &totals.tickets_by_status {
        let _ = writeln!(out, "  {:<16} {}", status.status, status.count);
    }
    out
}
