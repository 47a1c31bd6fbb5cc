//! # deskmail-mime
//!
//! MIME message generation for writing stored email out as `.eml` files.
//!
//! ## Features
//!
//! - **Message generation**: Build RFC 5322 messages with attachments
//! - **Addresses**: Validated addresses and display-name mailboxes
//! - **Encoding**: Base64, Quoted-Printable, RFC 2047 and RFC 2231
//! - **Dates**: RFC 2822 `Date` header rendering
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::{TimeZone, Utc};
//! use deskmail_mime::{Attachment, BodyKind, Mailbox, MessageBuilder};
//!
//! let message = MessageBuilder::new()
//!     .from(Mailbox::with_name("Support", "support@example.com")?)
//!     .to(Mailbox::new("customer@example.com")?)
//!     .subject("Your ticket")
//!     .date(Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap())
//!     .body("We have received your request.", BodyKind::Plain)
//!     .attach(Attachment::new("log.txt", b"...".to_vec()))
//!     .build()?;
//!
//! std::fs::write("ticket.eml", message.to_bytes()?)?;
//! ```
//!
//! The builder never stamps the current time: a `Date` must always be given,
//! which keeps exported archives faithful to when mail was actually sent.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod builder;
mod content_type;
mod date;
mod error;
mod header;
mod message;

pub mod encoding;

pub use address::{Address, Mailbox};
pub use builder::{Attachment, BodyKind, MessageBuilder};
pub use content_type::ContentType;
pub use date::format_rfc2822;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
