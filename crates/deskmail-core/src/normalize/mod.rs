//! Turning loosely formatted stored fields into well-formed message parts.

mod address;
mod content;
mod filename;

pub use address::{merge_recipients, parse_mailbox, parse_mailbox_list};
pub use content::{classify_body, is_html};
pub use filename::{
    EXTENSION, MAX_BASE_NAME_CHARS, MAX_COLLISION_ATTEMPTS, base_file_name, sanitize, unique_path,
};
