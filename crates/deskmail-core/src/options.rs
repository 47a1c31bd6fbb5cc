//! Export configuration.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{Error, Result};

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "./exports";

/// Half-open timestamp range `[from, to)`; either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Creates a range, rejecting an empty or inverted one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `from >= to`.
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(start), Some(end)) = (from, to)
            && start >= end
        {
            return Err(Error::Config(format!(
                "'from' ({start}) must be earlier than 'to' ({end})"
            )));
        }
        Ok(Self { from, to })
    }

    /// The unbounded range.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Returns true if `timestamp` lies within the range.
    #[must_use]
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| *timestamp >= from) && self.to.is_none_or(|to| *timestamp < to)
    }
}

/// Options for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Database connection target (`sqlite:` URL or file path).
    pub connection: String,
    /// Directory receiving the `.eml` files.
    pub output_dir: PathBuf,
    /// Timestamp filter.
    pub range: TimeRange,
    /// Base directory for relative attachment locations.
    pub attachment_root: Option<PathBuf>,
}

impl ExportOptions {
    /// Creates options with the default output directory and no filter.
    #[must_use]
    pub fn new(connection: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            range: TimeRange::all(),
            attachment_root: None,
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the timestamp filter.
    #[must_use]
    pub const fn with_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    /// Sets the attachment root.
    #[must_use]
    pub fn with_attachment_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.attachment_root = Some(root.into());
        self
    }
}

/// Parses a time bound given on the command line or in settings.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD` (midnight). Values without an offset are UTC.
///
/// # Errors
///
/// Returns a configuration error if the value matches none of the formats.
pub fn parse_time_bound(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::Config(format!("Unrecognized date/time: {value}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_time_bound("2024-01-02").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_time_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(parse_time_bound("2024-03-04 05:06:07").unwrap(), expected);
        assert_eq!(parse_time_bound("2024-03-04T05:06:07").unwrap(), expected);
        assert_eq!(parse_time_bound("2024-03-04T07:06:07+02:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_time_bound("yesterday"), Err(Error::Config(_))));
    }

    #[test]
    fn test_range_rejects_inverted() {
        let a = parse_time_bound("2024-01-02").unwrap();
        let b = parse_time_bound("2024-01-01").unwrap();
        assert!(TimeRange::new(Some(a), Some(b)).is_err());
        assert!(TimeRange::new(Some(a), Some(a)).is_err());
        assert!(TimeRange::new(Some(b), Some(a)).is_ok());
    }

    #[test]
    fn test_range_is_half_open() {
        let from = parse_time_bound("2024-01-01").unwrap();
        let to = parse_time_bound("2024-01-02").unwrap();
        let range = TimeRange::new(Some(from), Some(to)).unwrap();

        assert!(range.contains(&from));
        assert!(!range.contains(&to));
        assert!(TimeRange::all().contains(&to));
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::new("sqlite:help.db");
        assert_eq!(options.output_dir, PathBuf::from("./exports"));
        assert_eq!(options.range, TimeRange::all());
    }
}
