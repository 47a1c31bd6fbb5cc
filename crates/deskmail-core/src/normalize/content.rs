//! Body classification.

use deskmail_mime::BodyKind;

const CLOSING_TAGS: [&str; 6] = ["</html>", "</body>", "</p>", "</div>", "</span>", "</table>"];

/// Returns true when a stored body looks like HTML.
///
/// A body is HTML if it opens with a doctype or `<html>` element, or if it
/// contains a closing tag of a common block element. Matching ignores case.
#[must_use]
pub fn is_html(body: &str) -> bool {
    let lowered = body.trim_start().to_ascii_lowercase();
    if lowered.starts_with("<!doctype") || lowered.starts_with("<html") {
        return true;
    }
    CLOSING_TAGS.iter().any(|tag| lowered.contains(tag))
}

/// Picks the body content type for a stored body.
#[must_use]
pub fn classify_body(body: &str) -> BodyKind {
    if is_html(body) {
        BodyKind::Html
    } else {
        BodyKind::Plain
    }
}
