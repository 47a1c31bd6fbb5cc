//! Exporting records as `.eml` files.

mod batch;
mod compose;
mod report;
mod writer;

pub use batch::{Exporter, run_export};
pub use compose::{
    DIRECTION_HEADER, RECORD_ID_HEADER, compose_message, load_attachments, message_id,
    resolve_location,
};
pub use report::{DirectionSummary, ExportReport};
pub use writer::write_message;
