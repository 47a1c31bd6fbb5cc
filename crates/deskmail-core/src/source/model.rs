//! Message source models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Which of the two parallel message schemas a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Mail received by the help desk.
    Inbound,
    /// Mail sent by the help desk.
    Outbound,
}

impl Direction {
    /// Export order.
    pub const ALL: [Self; 2] = [Self::Inbound, Self::Outbound];

    /// Name used in file names, headers and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "Inbound",
            Self::Outbound => "Outbound",
        }
    }

    /// Table holding the messages.
    #[must_use]
    pub const fn message_table(self) -> &'static str {
        match self {
            Self::Inbound => "InboundMessages",
            Self::Outbound => "OutboundMessages",
        }
    }

    /// Table linking messages to rows of `Attachments`.
    #[must_use]
    pub const fn attachment_link_table(self) -> &'static str {
        match self {
            Self::Inbound => "InboundMessageAttachments",
            Self::Outbound => "OutboundMessageAttachments",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored email, as read from a message table.
///
/// Address fields hold the raw column text; parsing happens during export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Row identifier, unique within its direction.
    pub id: i64,
    /// Source table.
    pub direction: Direction,
    /// Raw sender field.
    pub from: String,
    /// Raw primary recipient field.
    pub primary_to: String,
    /// Raw recipient field.
    pub to: String,
    /// Raw carbon-copy field.
    pub cc: String,
    /// Raw blind-carbon-copy field.
    pub bcc: String,
    /// When the message was sent or received.
    pub timestamp: DateTime<Utc>,
    /// Subject line (may be empty).
    pub subject: String,
    /// Body text (may be empty, HTML or plain).
    pub body: String,
}

impl MessageRecord {
    /// Short identity used in log lines, e.g. `Inbound #42`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} #{}", self.direction, self.id)
    }
}

/// Link from a message to a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Row identifier in `Attachments`.
    pub id: i64,
    /// Name shown to the recipient.
    pub file_name: String,
    /// Path or `file://` URI of the stored content (may be empty).
    pub location: String,
}
