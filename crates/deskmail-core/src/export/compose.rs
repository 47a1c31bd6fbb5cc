//! Record to message conversion.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use deskmail_mime::{Attachment, Message, MessageBuilder};

use crate::error::{Error, Result};
use crate::log::ExportLog;
use crate::normalize::{classify_body, merge_recipients, parse_mailbox, parse_mailbox_list};
use crate::source::{AttachmentRef, MessageRecord};

/// Header naming the source direction of an exported file.
pub const DIRECTION_HEADER: &str = "X-Deskmail-Direction";

/// Header naming the source row of an exported file.
pub const RECORD_ID_HEADER: &str = "X-Deskmail-Record-Id";

/// Stable Message-ID for a record, without angle brackets.
#[must_use]
pub fn message_id(record: &MessageRecord) -> String {
    format!(
        "{}.{}.{}@deskmail.export",
        record.timestamp.format("%Y%m%d%H%M%S"),
        record.direction,
        record.id
    )
}

/// Builds the message for a record with already loaded attachments.
///
/// Unusable address fields are dropped; a sender that cannot be parsed is
/// reported through `log` and the message is built without one.
///
/// # Errors
///
/// Returns an error if the message cannot be assembled.
pub fn compose_message(
    record: &MessageRecord,
    attachments: Vec<Attachment>,
    log: &dyn ExportLog,
) -> Result<Message> {
    let mut builder = MessageBuilder::new()
        .date(record.timestamp)
        .subject(record.subject.as_str())
        .message_id(message_id(record))
        .header(DIRECTION_HEADER, record.direction.as_str())
        .header(RECORD_ID_HEADER, record.id.to_string())
        .body(record.body.as_str(), classify_body(&record.body));

    match parse_mailbox(&record.from) {
        Some(sender) => builder = builder.from(sender),
        None if !record.from.trim().is_empty() => log.warn(&format!(
            "{}: sender {:?} is not a valid address, exporting without From",
            record.label(),
            record.from
        )),
        None => {}
    }

    for mailbox in merge_recipients(&record.primary_to, &record.to) {
        builder = builder.to(mailbox);
    }
    for mailbox in parse_mailbox_list(&record.cc) {
        builder = builder.cc(mailbox);
    }
    for mailbox in parse_mailbox_list(&record.bcc) {
        builder = builder.bcc(mailbox);
    }
    for attachment in attachments {
        builder = builder.attach(attachment);
    }

    Ok(builder.build()?)
}

/// Reads the files behind a record's attachment links.
///
/// Links with no location or whose file does not exist are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`Error::AttachmentRead`] when a file exists but cannot be read.
pub async fn load_attachments(
    record: &MessageRecord,
    refs: &[AttachmentRef],
    root: Option<&Path>,
    log: &dyn ExportLog,
) -> Result<Vec<Attachment>> {
    let mut attachments = Vec::with_capacity(refs.len());

    for attachment in refs {
        let Some(path) = resolve_location(&attachment.location, root) else {
            log.warn(&format!(
                "{}: attachment {} has no location, skipping",
                record.label(),
                attachment.id
            ));
            continue;
        };

        match tokio::fs::read(&path).await {
            Ok(data) => {
                attachments.push(Attachment::new(display_name(attachment, &path), data));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log.warn(&format!(
                    "{}: attachment {:?} not found at {}, exporting without it",
                    record.label(),
                    attachment.file_name,
                    path.display()
                ));
            }
            Err(source) => return Err(Error::AttachmentRead { path, source }),
        }
    }

    Ok(attachments)
}

/// Turns a stored location into a file path.
///
/// `file://` URIs are reduced to their path. Relative paths are joined to
/// `root` when one is given.
#[must_use]
pub fn resolve_location(location: &str, root: Option<&Path>) -> Option<PathBuf> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
    match root {
        Some(root) if path.is_relative() => Some(root.join(path)),
        _ => Some(path.to_path_buf()),
    }
}

fn display_name(attachment: &AttachmentRef, path: &Path) -> String {
    let name = attachment.file_name.trim();
    if !name.is_empty() {
        return name.to_string();
    }
    path.file_name().map_or_else(
        || format!("attachment-{}", attachment.id),
        |n| n.to_string_lossy().into_owned(),
    )
}
