//! Message builder.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::address::Mailbox;
use crate::content_type::ContentType;
use crate::date::format_rfc2822;
use crate::encoding::{encode_rfc2047, encode_rfc2231, is_header_safe};
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::{Message, Part, TransferEncoding};

/// Kind of text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// `text/plain`.
    #[default]
    Plain,
    /// `text/html`.
    Html,
}

impl BodyKind {
    fn content_type(self) -> ContentType {
        match self {
            Self::Plain => ContentType::text_plain(),
            Self::Html => ContentType::text_html(),
        }
    }
}

/// A file attached to a message.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub filename: String,
    /// Content type of the data.
    pub content_type: ContentType,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment, guessing the content type from the file name.
    #[must_use]
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = ContentType::for_file_name(&filename);
        Self {
            filename,
            content_type,
            data,
        }
    }

    fn into_part(self) -> Part {
        let mut headers = Headers::new();
        let quoted = self.filename.replace('\\', "\\\\").replace('"', "\\\"");

        if is_header_safe(&self.filename) {
            headers.add(
                "Content-Type",
                format!("{}; name=\"{quoted}\"", self.content_type),
            );
            headers.add(
                "Content-Disposition",
                format!("attachment; filename=\"{quoted}\""),
            );
        } else {
            // Encoded word for older readers, RFC 2231 for compliant ones
            headers.add(
                "Content-Type",
                format!(
                    "{}; name=\"{}\"",
                    self.content_type,
                    encode_rfc2047(&self.filename, "utf-8")
                ),
            );
            headers.add(
                "Content-Disposition",
                format!("attachment; filename*={}", encode_rfc2231(&self.filename)),
            );
        }
        headers.add("Content-Transfer-Encoding", TransferEncoding::Base64.to_string());

        Part::new(headers, TransferEncoding::Base64.encode(&self.data))
    }
}

/// Builds a [`Message`] from structured fields.
///
/// A `Date` must be supplied explicitly; the builder never stamps the current
/// time.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    subject: String,
    date: Option<DateTime<Utc>>,
    message_id: Option<String>,
    body: String,
    body_kind: BodyKind,
    attachments: Vec<Attachment>,
    extra_headers: Vec<(String, String)>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender.
    #[must_use]
    pub fn from(mut self, mailbox: Mailbox) -> Self {
        self.from = Some(mailbox);
        self
    }

    /// Adds a To recipient.
    #[must_use]
    pub fn to(mut self, mailbox: Mailbox) -> Self {
        self.to.push(mailbox);
        self
    }

    /// Adds a Cc recipient.
    #[must_use]
    pub fn cc(mut self, mailbox: Mailbox) -> Self {
        self.cc.push(mailbox);
        self
    }

    /// Adds a Bcc recipient.
    #[must_use]
    pub fn bcc(mut self, mailbox: Mailbox) -> Self {
        self.bcc.push(mailbox);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the Date header.
    #[must_use]
    pub const fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the Message-ID (without angle brackets).
    #[must_use]
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Sets the body with an explicit kind.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>, kind: BodyKind) -> Self {
        self.body = body.into();
        self.body_kind = kind;
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds a custom header (ASCII name and value).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if no date was set or a custom header is malformed.
    pub fn build(self) -> Result<Message> {
        let date = self.date.ok_or(Error::MissingHeader("Date"))?;

        let mut headers = Headers::new();
        headers.add("Date", format_rfc2822(&date));
        if let Some(from) = &self.from {
            headers.add("From", from.to_string());
        }
        for (name, list) in [("To", &self.to), ("Cc", &self.cc), ("Bcc", &self.bcc)] {
            if !list.is_empty() {
                headers.add(name, join_mailboxes(list));
            }
        }
        headers.add("Subject", encode_rfc2047(&single_line(&self.subject), "utf-8"));
        if let Some(id) = &self.message_id {
            headers.add("Message-ID", format!("<{id}>"));
        }
        for (name, value) in self.extra_headers {
            validate_custom_header(&name, &value)?;
            headers.add(name, value);
        }
        headers.add("MIME-Version", "1.0");

        let body_type = self.body_kind.content_type();
        let body_encoding = TransferEncoding::for_text(&self.body);

        if self.attachments.is_empty() {
            headers.add("Content-Type", body_type.to_string());
            headers.add("Content-Transfer-Encoding", body_encoding.to_string());
            let body = body_encoding.encode(self.body.as_bytes());
            return Ok(Message::single_part(headers, body));
        }

        let boundary = generate_boundary();
        headers.add(
            "Content-Type",
            ContentType::multipart_mixed(boundary.clone()).to_string(),
        );

        let mut parts = Vec::with_capacity(self.attachments.len() + 1);
        parts.push(Part::encoded(&body_type, body_encoding, self.body.as_bytes()));
        parts.extend(self.attachments.into_iter().map(Attachment::into_part));

        Ok(Message::multipart(headers, boundary, parts))
    }
}

fn join_mailboxes(list: &[Mailbox]) -> String {
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapses line breaks so stored text cannot inject extra headers.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn validate_custom_header(name: &str, value: &str) -> Result<()> {
    let name_ok = !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && b != b':');
    if !name_ok || !is_header_safe(value) {
        return Err(Error::InvalidHeader(format!("{name}: {value}")));
    }
    Ok(())
}

fn generate_boundary() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("----=_deskmail_{token}")
}
