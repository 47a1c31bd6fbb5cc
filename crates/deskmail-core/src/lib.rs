//! # deskmail-core
//!
//! Core logic for exporting a help-desk mail store to `.eml` files.
//!
//! This crate provides:
//! - Record source over the inbound and outbound message tables
//! - Address, body and file name normalization
//! - The export batch with per-record fault isolation
//! - Pre-flight authorization and cooperative cancellation
//! - Agent and ticket reporting, plus ticket deletion

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod admin;
pub mod auth;
mod cancel;
pub mod database;
mod error;
pub mod export;
pub mod log;
pub mod normalize;
mod options;
pub mod source;

#[cfg(test)]
mod test_support;

pub use admin::{AdminRepository, StatusCount, Totals};
pub use auth::{AllowAll, Authorization, Authorizer, RegistrationKey};
pub use cancel::CancellationFlag;
pub use database::{AccessMode, connect};
pub use error::{Error, Result};
pub use export::{DirectionSummary, ExportReport, Exporter, run_export};
pub use log::{ExportLog, LogLevel, MemoryLog, TracingLog};
pub use options::{DEFAULT_OUTPUT_DIR, ExportOptions, TimeRange, parse_time_bound};
pub use source::{AttachmentRef, Direction, MessageRecord, MessageRepository};
