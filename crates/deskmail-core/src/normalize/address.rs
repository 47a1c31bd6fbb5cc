//! Lenient address parsing for stored address fields.
//!
//! Stored fields are free text typed by people and mail clients over many
//! years. Nothing here fails: unusable input yields `None` or is dropped
//! from a list.

use deskmail_mime::{Address, Mailbox};

/// Parses a single `Display Name <addr@x>` or bare `addr@x` value.
///
/// When the value is malformed, the first angle-bracketed substring holding
/// a valid address is used without a display name.
#[must_use]
pub fn parse_mailbox(input: &str) -> Option<Mailbox> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(mailbox) = parse_name_addr(input) {
        return Some(mailbox);
    }

    if Address::is_valid(input) {
        return Mailbox::new(input).ok();
    }

    angle_bracket_candidates(input).find_map(|candidate| Mailbox::new(candidate).ok())
}

/// Splits a recipient field on `,` and `;` and parses each entry.
///
/// Empty segments and entries without a valid address are discarded.
#[must_use]
pub fn parse_mailbox_list(input: &str) -> Vec<Mailbox> {
    input
        .split([',', ';'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(parse_mailbox)
        .collect()
}

/// Builds the single To list: primary recipients first, then the rest.
#[must_use]
pub fn merge_recipients(primary_to: &str, to: &str) -> Vec<Mailbox> {
    let mut recipients = parse_mailbox_list(primary_to);
    recipients.extend(parse_mailbox_list(to));
    recipients
}

/// Well-formed `name <addr>` with nothing after the closing bracket.
fn parse_name_addr(input: &str) -> Option<Mailbox> {
    let body = input.strip_suffix('>')?;
    let open = body.rfind('<')?;
    let address = body[open + 1..].trim();
    let name = unquote(body[..open].trim());

    Mailbox::with_name(name, address).ok()
}

fn angle_bracket_candidates(input: &str) -> impl Iterator<Item = &str> {
    input.match_indices('<').filter_map(move |(open, _)| {
        let rest = &input[open + 1..];
        rest.find('>').map(|close| rest[..close].trim())
    })
}

/// Strips one pair of surrounding quotes and unescapes `\"`.
fn unquote(name: &str) -> String {
    let inner = name
        .strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
        .or_else(|| name.strip_prefix('\'').and_then(|n| n.strip_suffix('\'')))
        .unwrap_or(name);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}
