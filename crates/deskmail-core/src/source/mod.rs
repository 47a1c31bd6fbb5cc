//! Record source: message rows and their attachments.

mod model;
mod repository;

pub use model::{AttachmentRef, Direction, MessageRecord};
pub use repository::{MessageRepository, RecordCursor};
