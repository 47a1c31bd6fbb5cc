//! MIME header handling.

use std::fmt;

/// Preferred maximum length of a rendered header line.
const FOLD_WIDTH: usize = 78;

/// Ordered collection of email headers.
///
/// Headers render in insertion order with their original capitalization,
/// CRLF-terminated and folded at whitespace when longer than 78 characters.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Gets the first value for a header (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over all headers in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Writes one header, folding long values at spaces.
///
/// Values may already contain `CRLF SP` folds (e.g. a run of encoded words);
/// each such segment is folded independently.
fn write_folded(f: &mut fmt::Formatter<'_>, name: &str, value: &str) -> fmt::Result {
    write!(f, "{name}:")?;
    let mut line_len = name.len() + 1;

    for (segment_index, segment) in value.split("\r\n").enumerate() {
        if segment_index > 0 {
            f.write_str("\r\n")?;
            line_len = 0;
        }

        for (word_index, word) in segment.split(' ').enumerate() {
            let continuation = segment_index > 0 && word_index == 0;
            if !continuation {
                if line_len + 1 + word.len() > FOLD_WIDTH && line_len > 1 && !word.is_empty() {
                    f.write_str("\r\n")?;
                    line_len = 0;
                }
                f.write_str(" ")?;
                line_len += 1;
            }
            f.write_str(word)?;
            line_len += word.len();
        }
    }

    f.write_str("\r\n")
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            write_folded(f, name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_keep_insertion_order() {
        let mut headers = Headers::new();
        headers.add("From", "a@example.com");
        headers.add("To", "alice@example.com");
        headers.add("To", "bob@example.com");
        headers.add("Subject", "Hi");
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["From", "To", "To", "Subject"]);
        assert_eq!(headers.get("To"), Some("alice@example.com"));
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_headers_display_order_and_crlf() {
        let mut headers = Headers::new();
        headers.add("To", "recipient@example.com");
        headers.add("From", "sender@example.com");

        assert_eq!(
            headers.to_string(),
            "To: recipient@example.com\r\nFrom: sender@example.com\r\n"
        );
    }

    #[test]
    fn test_long_header_folds_at_spaces() {
        let recipients: Vec<String> = (0..10).map(|i| format!("user{i}@example.com")).collect();
        let mut headers = Headers::new();
        headers.add("To", recipients.join(", "));

        let rendered = headers.to_string();
        for line in rendered.trim_end().split("\r\n") {
            assert!(line.len() <= 78, "line too long: {line}");
        }
        // Unfolding restores the original value
        let unfolded = rendered.replace("\r\n ", " ");
        assert_eq!(unfolded, format!("To: {}\r\n", recipients.join(", ")));
    }

    #[test]
    fn test_prefolded_value_is_preserved() {
        let mut headers = Headers::new();
        headers.add("Subject", "=?utf-8?B?QUFB?=\r\n =?utf-8?B?QkJC?=");
        assert_eq!(
            headers.to_string(),
            "Subject: =?utf-8?B?QUFB?=\r\n =?utf-8?B?QkJC?=\r\n"
        );
    }
}
