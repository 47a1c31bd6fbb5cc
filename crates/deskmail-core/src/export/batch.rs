//! The export batch: every record of every direction, one at a time.

use std::path::PathBuf;

use crate::auth::Authorizer;
use crate::cancel::CancellationFlag;
use crate::database::{self, AccessMode};
use crate::error::{Error, Result};
use crate::log::ExportLog;
use crate::normalize::base_file_name;
use crate::options::ExportOptions;
use crate::source::{Direction, MessageRecord, MessageRepository};

use super::compose::{compose_message, load_attachments};
use super::report::{DirectionSummary, ExportReport};
use super::writer::write_message;

/// Successful exports between progress messages.
const PROGRESS_INTERVAL: u64 = 50;

/// Authorizes, connects and runs a full export.
///
/// # Errors
///
/// Returns an error if authorization is denied, the database cannot be
/// opened or queried, or the output directory is unusable. Failures of
/// single records are logged and counted instead.
pub async fn run_export(
    options: &ExportOptions,
    authorizer: &dyn Authorizer,
    log: &dyn ExportLog,
    cancel: CancellationFlag,
) -> Result<ExportReport> {
    authorizer.authorize().into_result()?;

    let pool = database::connect(&options.connection, AccessMode::ReadOnly).await?;
    let repo = MessageRepository::new(pool);

    Exporter::new(&repo, options, log)
        .with_cancellation(cancel)
        .run()
        .await
}

/// Drives records through composition and writing.
pub struct Exporter<'a> {
    repo: &'a MessageRepository,
    options: &'a ExportOptions,
    log: &'a dyn ExportLog,
    cancel: CancellationFlag,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter over an open repository.
    #[must_use]
    pub fn new(
        repo: &'a MessageRepository,
        options: &'a ExportOptions,
        log: &'a dyn ExportLog,
    ) -> Self {
        Self {
            repo,
            options,
            log,
            cancel: CancellationFlag::new(),
        }
    }

    /// Uses `cancel` to stop the run between records.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or a
    /// database query fails.
    pub async fn run(&self) -> Result<ExportReport> {
        let dir = &self.options.output_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| Error::OutputDirectory {
                path: dir.clone(),
                source,
            })?;
        self.log.info(&format!("Exporting messages to {}", dir.display()));

        let mut report = ExportReport::default();
        for direction in Direction::ALL {
            let summary = self.export_direction(direction).await?;
            report.directions.push(summary);

            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
        }

        if report.cancelled {
            self.log.warn(&format!(
                "Export cancelled: {} messages exported, {} skipped",
                report.exported(),
                report.failed()
            ));
        } else {
            self.log.info(&format!(
                "Export complete: {} messages exported, {} skipped",
                report.exported(),
                report.failed()
            ));
        }
        Ok(report)
    }

    async fn export_direction(&self, direction: Direction) -> Result<DirectionSummary> {
        let mut summary = DirectionSummary::new(direction);

        let undated = self.repo.count_undated(direction).await?;
        if undated > 0 {
            self.log.warn(&format!(
                "{direction}: {undated} messages have no usable date and are skipped"
            ));
        }

        let mut cursor = self.repo.records(direction, self.options.range);
        loop {
            if self.cancel.is_cancelled() {
                self.log.warn(&format!("{direction}: cancelled, stopping"));
                break;
            }

            let Some(record) = cursor.next_record().await? else {
                break;
            };

            match self.export_record(&record).await {
                Ok(path) => {
                    summary.exported += 1;
                    self.log
                        .debug(&format!("{}: wrote {}", record.label(), path.display()));
                    if summary.exported % PROGRESS_INTERVAL == 0 {
                        self.log.info(&format!(
                            "{direction}: {} messages exported so far",
                            summary.exported
                        ));
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    summary.failed += 1;
                    self.log.error(&format!("{}: skipped: {e}", record.label()));
                }
            }
        }

        self.log.info(&format!(
            "{direction}: {} messages exported, {} skipped",
            summary.exported, summary.failed
        ));
        Ok(summary)
    }

    async fn export_record(&self, record: &MessageRecord) -> Result<PathBuf> {
        let refs = self.repo.attachments(record.direction, record.id).await?;
        let attachments = load_attachments(
            record,
            &refs,
            self.options.attachment_root.as_deref(),
            self.log,
        )
        .await?;

        let message = compose_message(record, attachments, self.log)?;
        let bytes = message.to_bytes()?;
        write_message(&self.options.output_dir, &base_file_name(record), &bytes).await
    }
}
