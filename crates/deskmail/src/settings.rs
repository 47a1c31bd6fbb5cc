//! Persistent settings and their merge with command-line options.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use deskmail_core::{DEFAULT_OUTPUT_DIR, ExportOptions, TimeRange};
use serde::{Deserialize, Serialize};

use crate::cli::ExportArgs;

/// Defaults read from `settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database connection target.
    pub connection: Option<String>,
    /// Export directory.
    pub output_dir: Option<PathBuf>,
    /// Base directory for relative attachment locations.
    pub attachment_root: Option<PathBuf>,
    /// Log file mirror.
    pub log_file: Option<PathBuf>,
    /// Registration key.
    pub registration_key: Option<String>,
}

impl Settings {
    /// Location used when `--config` is not given.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deskmail")
            .join("settings.json")
    }

    /// Loads settings from `path`, or from [`Settings::default_path`].
    ///
    /// A missing default file yields empty settings; a missing explicit file
    /// is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        Ok(settings)
    }

    /// Connection target: command line first, then settings.
    pub fn connection(&self, cli: Option<&str>) -> Result<String> {
        match cli.or(self.connection.as_deref()) {
            Some(target) if !target.trim().is_empty() => Ok(target.trim().to_string()),
            _ => bail!("No database configured (use --conn, DESKMAIL_CONN or the settings file)"),
        }
    }

    /// Registration key: command line or environment first, then settings.
    pub fn registration_key(&self, cli: Option<&str>) -> Option<String> {
        cli.or(self.registration_key.as_deref()).map(str::to_string)
    }

    /// Builds export options from `args` over these settings.
    pub fn export_options(&self, args: &ExportArgs) -> Result<ExportOptions> {
        let connection = self.connection(args.conn.connection.as_deref())?;
        let range = TimeRange::new(args.from, args.to).context("Invalid time range")?;

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let mut options = ExportOptions::new(connection)
            .with_output_dir(output_dir)
            .with_range(range);
        if let Some(root) = args
            .attachment_root
            .clone()
            .or_else(|| self.attachment_root.clone())
        {
            options = options.with_attachment_root(root);
        }
        Ok(options)
    }
}
