//! MIME content type handling.

use std::fmt;

/// MIME content type with parameters.
///
/// Parameters keep insertion order so rendered headers are stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// Creates a multipart/mixed content type with boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// Creates an application/octet-stream content type.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Guesses a content type from a file name's extension.
    ///
    /// Unknown extensions map to `application/octet-stream`.
    #[must_use]
    pub fn for_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let (main_type, sub_type) = match extension.as_str() {
            "txt" | "log" => ("text", "plain"),
            "htm" | "html" => ("text", "html"),
            "csv" => ("text", "csv"),
            "xml" => ("application", "xml"),
            "json" => ("application", "json"),
            "pdf" => ("application", "pdf"),
            "zip" => ("application", "zip"),
            "doc" => ("application", "msword"),
            "docx" => (
                "application",
                "vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            "xls" => ("application", "vnd.ms-excel"),
            "xlsx" => (
                "application",
                "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            "png" => ("image", "png"),
            "jpg" | "jpeg" => ("image", "jpeg"),
            "gif" => ("image", "gif"),
            "bmp" => ("image", "bmp"),
            "eml" => ("message", "rfc822"),
            _ => return Self::octet_stream(),
        };

        Self::new(main_type, sub_type)
    }

    /// Adds a parameter, replacing an existing one with the same name.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into().to_ascii_lowercase();
        let value = value.into();
        if let Some(existing) = self.parameters.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.parameters.push((key, value));
        }
        self
    }

    /// Returns a parameter value by name.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("text")
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.parameters {
            // Quote value if it contains special characters
            if value.is_empty()
                || value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c))
            {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {key}=\"{escaped}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_new() {
        let ct = ContentType::new("text", "plain");
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "plain");
        assert!(ct.parameters.is_empty());
    }

    #[test]
    fn test_text_plain() {
        let ct = ContentType::text_plain();
        assert_eq!(ct.mime_type(), "text/plain");
        assert_eq!(ct.charset(), Some("utf-8"));
        assert!(ct.is_text());
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed("boundary123");
        assert_eq!(ct.boundary(), Some("boundary123"));
        assert!(ct.is_multipart());
    }

    #[test]
    fn test_for_file_name() {
        assert_eq!(ContentType::for_file_name("report.PDF").mime_type(), "application/pdf");
        assert_eq!(ContentType::for_file_name("photo.jpeg").mime_type(), "image/jpeg");
        assert_eq!(
            ContentType::for_file_name("archive.tar.gz").mime_type(),
            "application/octet-stream"
        );
        assert_eq!(
            ContentType::for_file_name("README").mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_content_type_display() {
        assert_eq!(
            ContentType::text_html().to_string(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            ContentType::multipart_mixed("----=_Part_1").to_string(),
            "multipart/mixed; boundary=\"----=_Part_1\""
        );
    }

    #[test]
    fn test_with_parameter_replaces() {
        let ct = ContentType::text_plain().with_parameter("Charset", "iso-8859-1");
        assert_eq!(ct.parameters.len(), 1);
        assert_eq!(ct.charset(), Some("iso-8859-1"));
    }
}
