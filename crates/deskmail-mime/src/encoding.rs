//! MIME encoding utilities.
//!
//! Supports Base64 (line-wrapped), Quoted-Printable, RFC 2047 header encoding
//! and RFC 2231 parameter encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Maximum encoded line length for Base64 and Quoted-Printable bodies.
const MAX_LINE_LENGTH: usize = 76;

/// Maximum number of raw bytes carried by a single RFC 2047 encoded word.
///
/// 45 bytes become 60 Base64 characters, which keeps `=?utf-8?B?...?=`
/// under the 75 character limit.
const ENCODED_WORD_BYTES: usize = 45;

/// Encodes data as Base64 on a single line.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 split into CRLF-terminated lines of 76 characters.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    // Base64 output is ASCII, so byte chunks are valid str slices.
    for (index, chunk) in encoded.as_bytes().chunks(MAX_LINE_LENGTH).enumerate() {
        if index > 0 {
            result.push_str("\r\n");
        }
        result.push_str(&String::from_utf8_lossy(chunk));
    }

    result
}

/// Encodes text using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks in the input (LF or CRLF) become hard CRLF breaks; long lines
/// get soft breaks so no encoded line exceeds 76 characters.
#[must_use]
pub fn encode_quoted_printable(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            result.push_str("\r\n");
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        encode_quoted_printable_line(line.as_bytes(), &mut result);
    }

    result
}

fn encode_quoted_printable_line(bytes: &[u8], out: &mut String) {
    let mut line_length = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        let is_last = index + 1 == bytes.len();
        let literal = match byte {
            b'!'..=b'<' | b'>'..=b'~' => true,
            // Trailing whitespace would be stripped in transit
            b' ' | b'\t' => !is_last,
            _ => false,
        };
        let width = if literal { 1 } else { 3 };

        // Leave one column for the soft break marker
        if line_length + width > MAX_LINE_LENGTH - 1 {
            out.push_str("=\r\n");
            line_length = 0;
        }

        if literal {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "={byte:02X}");
        }
        line_length += width;
    }
}

/// Returns true if the header text can be emitted without RFC 2047 encoding.
#[must_use]
pub fn is_header_safe(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b == b'\t' || b.is_ascii_graphic()) && !text.contains("=?")
}

/// Encodes a header value using RFC 2047 Base64 encoded words.
///
/// Text that is already safe is returned unchanged. Longer text is split into
/// several encoded words on character boundaries, separated by folding
/// whitespace.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if is_header_safe(text) {
        return text.to_string();
    }

    let mut words = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_len = 0;

    for (offset, ch) in text.char_indices() {
        let len = ch.len_utf8();
        if chunk_len + len > ENCODED_WORD_BYTES {
            words.push(&text[chunk_start..offset]);
            chunk_start = offset;
            chunk_len = 0;
        }
        chunk_len += len;
    }
    words.push(&text[chunk_start..]);

    words
        .iter()
        .map(|word| format!("=?{charset}?B?{}?=", encode_base64(word.as_bytes())))
        .collect::<Vec<_>>()
        .join("\r\n ")
}

/// Encodes a parameter value using RFC 2231 (`utf-8''percent-encoded`).
#[must_use]
pub fn encode_rfc2231(value: &str) -> String {
    let mut result = String::from("utf-8''");

    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            result.push(char::from(byte));
        } else {
            let _ = write!(result, "%{byte:02X}");
        }
    }

    result
}

/// Renders a display name as an RFC 5322 phrase.
///
/// Non-ASCII names become encoded words; names containing specials are
/// quoted.
#[must_use]
pub fn encode_phrase(name: &str) -> String {
    if !is_header_safe(name) {
        return encode_rfc2047(name, "utf-8");
    }

    if name.contains(|c: char| "()<>[]:;@\\,.\"".contains(c)) {
        let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        name.to_string()
    }
}
