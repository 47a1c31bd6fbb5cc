//! MIME message structure and serialization.

use crate::content_type::ContentType;
use crate::encoding::{encode_base64_wrapped, encode_quoted_printable};
use crate::error::Result;
use crate::header::Headers;
use std::fmt;
use std::io::Write;

/// Longest line allowed in a `7bit` body (RFC 5322 section 2.1.1).
const MAX_7BIT_LINE: usize = 998;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Picks the encoding for a text body.
    ///
    /// Short-lined ASCII stays `7bit`; anything else is quoted-printable.
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        let plain_ascii = text
            .bytes()
            .all(|b| b == b'\t' || b == b'\r' || b == b'\n' || (b' '..=b'~').contains(&b));
        let short_lines = text
            .split(['\r', '\n'])
            .all(|line| line.len() <= MAX_7BIT_LINE);

        if plain_ascii && short_lines {
            Self::SevenBit
        } else {
            Self::QuotedPrintable
        }
    }

    /// Encodes a body with this transfer encoding.
    #[must_use]
    pub fn encode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::SevenBit => normalize_line_endings(&String::from_utf8_lossy(data)).into_bytes(),
            Self::QuotedPrintable => {
                encode_quoted_printable(&String::from_utf8_lossy(data)).into_bytes()
            }
            Self::Base64 => encode_base64_wrapped(data).into_bytes(),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
        }
    }
}

/// Converts every line ending (CRLF, bare LF or lone CR) to CRLF.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}

/// MIME message part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body, already transfer-encoded.
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Creates a part from raw content, encoding it and setting the
    /// `Content-Type` and `Content-Transfer-Encoding` headers.
    #[must_use]
    pub fn encoded(content_type: &ContentType, encoding: TransferEncoding, data: &[u8]) -> Self {
        let mut headers = Headers::new();
        headers.add("Content-Type", content_type.to_string());
        headers.add("Content-Transfer-Encoding", encoding.to_string());
        Self::new(headers, encoding.encode(data))
    }

    /// Gets the Content-Type header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }
}

/// MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Message parts (empty for single-part messages).
    pub parts: Vec<Part>,
    /// Body for single-part messages, already transfer-encoded.
    pub body: Option<Vec<u8>>,
    /// Boundary separating parts of a multipart message.
    pub boundary: Option<String>,
}

impl Message {
    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            parts: Vec::new(),
            body: Some(body),
            boundary: None,
        }
    }

    /// Creates a multipart message.
    #[must_use]
    pub const fn multipart(headers: Headers, boundary: String, parts: Vec<Part>) -> Self {
        Self {
            headers,
            parts,
            body: None,
            boundary: Some(boundary),
        }
    }

    /// Checks if this is a multipart message.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        self.boundary.is_some()
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }

    /// Writes the message in RFC 5322 wire form.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}\r\n", self.headers)?;

        match &self.boundary {
            Some(boundary) => {
                out.write_all(b"This is a multi-part message in MIME format.\r\n")?;
                for part in &self.parts {
                    write!(out, "\r\n--{boundary}\r\n{}\r\n", part.headers)?;
                    out.write_all(&part.body)?;
                }
                write!(out, "\r\n--{boundary}--\r\n")?;
            }
            None => {
                if let Some(body) = &self.body {
                    out.write_all(body)?;
                }
                if !self.body.as_ref().is_some_and(|b| b.ends_with(b"\r\n")) {
                    out.write_all(b"\r\n")?;
                }
            }
        }

        Ok(())
    }

    /// Renders the message to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}
