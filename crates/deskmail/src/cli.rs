//! Command-line interface.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Export a help-desk mail store to standard `.eml` files.
#[derive(Debug, Parser)]
#[command(name = "deskmail", version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to `deskmail/settings.json` in the config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug detail.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registration key for licensed builds.
    #[arg(long, global = true, env = "DESKMAIL_KEY", hide_env_values = true)]
    pub key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write every stored message as an `.eml` file.
    Export(ExportArgs),

    /// Show active agents and open tickets per status.
    Totals {
        #[command(flatten)]
        conn: ConnectionArgs,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Delete a ticket (soft by default).
    DeleteTicket {
        /// Ticket id.
        id: i64,

        /// Remove the row instead of marking it deleted.
        #[arg(long)]
        hard: bool,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
}

/// Database selection shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// `sqlite:` URL or path of the help-desk database.
    #[arg(long = "conn", env = "DESKMAIL_CONN", value_name = "TARGET")]
    pub connection: Option<String>,
}

/// Options of the `export` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Directory receiving the files.
    #[arg(long = "out", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only messages at or after this time.
    #[arg(long, value_name = "TIME", value_parser = parse_bound)]
    pub from: Option<DateTime<Utc>>,

    /// Only messages before this time.
    #[arg(long, value_name = "TIME", value_parser = parse_bound)]
    pub to: Option<DateTime<Utc>>,

    /// Base directory for relative attachment locations.
    #[arg(long = "attachments", value_name = "DIR")]
    pub attachment_root: Option<PathBuf>,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Log file requested on the command line.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.command {
            Command::Export(args) => args.log_file.clone(),
            _ => None,
        }
    }
}

fn parse_bound(value: &str) -> Result<DateTime<Utc>, String> {
    deskmail_core::parse_time_bound(value).map_err(|e| e.to_string())
}
