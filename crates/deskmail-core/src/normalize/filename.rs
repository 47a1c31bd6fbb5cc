//! Export file naming.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::source::MessageRecord;

/// Longest base name, in characters, before the extension.
pub const MAX_BASE_NAME_CHARS: usize = 140;

/// Numbered variants tried before giving up on a base name.
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Extension of exported files.
pub const EXTENSION: &str = "eml";

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Base file name for a record, without extension.
///
/// The name is `{yyyyMMdd_HHmmss}_{direction}_{id}_{subject}`, made safe
/// for common file systems by [`sanitize`].
#[must_use]
pub fn base_file_name(record: &MessageRecord) -> String {
    let prefix = format!(
        "{}_{}_{}",
        record.timestamp.format("%Y%m%d_%H%M%S"),
        record.direction,
        record.id
    );
    let cleaned = sanitize(&format!("{prefix}_{}", record.subject));
    if cleaned.is_empty() { prefix } else { cleaned }
}

/// Replaces characters that are invalid in file names with `_`, collapses
/// whitespace runs to one space, trims, and caps the length.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c.is_control() || FORBIDDEN.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_BASE_NAME_CHARS).collect();
    truncated.trim_end().to_string()
}

/// First free path in `dir` for `base_name`.
///
/// Tries `{base}.eml`, then `{base} (1).eml`, `{base} (2).eml` and so on.
///
/// # Errors
///
/// Returns [`Error::FileNameExhausted`] when every candidate is taken.
pub fn unique_path(dir: &Path, base_name: &str) -> Result<PathBuf> {
    let first = dir.join(format!("{base_name}.{EXTENSION}"));
    if !first.exists() {
        return Ok(first);
    }

    (1..=MAX_COLLISION_ATTEMPTS)
        .map(|n| dir.join(format!("{base_name} ({n}).{EXTENSION}")))
        .find(|candidate| !candidate.exists())
        .ok_or(Error::FileNameExhausted(first, MAX_COLLISION_ATTEMPTS))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::Direction;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn record(subject: &str) -> MessageRecord {
        MessageRecord {
            id: 7,
            direction: Direction::Inbound,
            from: String::new(),
            primary_to: String::new(),
            to: String::new(),
            cc: String::new(),
            bcc: String::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            subject: subject.to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_base_name_layout() {
        assert_eq!(
            base_file_name(&record("Printer offline")),
            "20240101_120000_Inbound_7_Printer offline"
        );
    }

    #[test]
    fn test_forbidden_characters_replaced() {
        assert_eq!(
            base_file_name(&record("Re: a/b \"c\" <d>?")),
            "20240101_120000_Inbound_7_Re_ a_b _c_ _d__"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(sanitize("  a   b\u{a0} c  "), "a b c");
        assert_eq!(sanitize("line\r\nbreak"), "line__break");
    }

    #[test]
    fn test_long_subject_truncated() {
        let name = base_file_name(&record(&"x".repeat(500)));
        assert_eq!(name.chars().count(), MAX_BASE_NAME_CHARS);
        assert!(name.starts_with("20240101_120000_Inbound_7_xxx"));
    }

    #[test]
    fn test_unique_path_numbers_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_path(dir.path(), "name").unwrap();
        assert_eq!(first, dir.path().join("name.eml"));

        std::fs::write(&first, b"x").unwrap();
        let second = unique_path(dir.path(), "name").unwrap();
        assert_eq!(second, dir.path().join("name (1).eml"));

        std::fs::write(&second, b"x").unwrap();
        assert_eq!(
            unique_path(dir.path(), "name").unwrap(),
            dir.path().join("name (2).eml")
        );
    }

    proptest! {
        #[test]
        fn prop_sanitized_names_are_safe(subject in "\\PC{0,300}|[\\x00-\\x1f<>:\"/\\\\|?* ]{0,50}") {
            let name = base_file_name(&record(&subject));
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().count() <= MAX_BASE_NAME_CHARS);
            prop_assert!(!name.chars().any(|c| c.is_control() || FORBIDDEN.contains(&c)));
            prop_assert!(!name.contains("  "));
            prop_assert_eq!(name.trim(), name.as_str());
        }
    }
}
