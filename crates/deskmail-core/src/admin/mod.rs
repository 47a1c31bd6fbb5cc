//! Help-desk reporting and ticket maintenance.

mod model;
mod repository;

pub use model::{StatusCount, Totals};
pub use repository::AdminRepository;
