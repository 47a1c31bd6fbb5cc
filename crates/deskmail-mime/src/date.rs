//! RFC 2822 date rendering.

use chrono::{DateTime, Utc};

/// Formats a timestamp for the `Date` header in RFC 2822 UTC form.
///
/// The day of month is always two digits: `Mon, 01 Jan 2024 00:00:00 +0000`.
#[must_use]
pub fn format_rfc2822(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}
