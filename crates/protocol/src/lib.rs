//! # Overview
//!
//! `protocol` implements the wire framing for the range-file-server binary
//! protocol: a single header byte carrying a 4-bit message type and two flag
//! bits, followed by an 8-byte big-endian length and that many bytes of
//! payload.
//!
//! # Design
//!
//! [`MessageType`] enumerates the closed set of request and reply types.
//! [`Header`] and [`Message`] model the parsed frame; [`read_message`] and
//! [`write_message`] perform the actual socket I/O. Higher layers (the
//! `daemon` crate) own payload interpretation and compression; this crate
//! only knows about bytes.
//!
//! # Errors
//!
//! I/O and malformed-frame conditions are reported through [`FramingError`].
//! A clean EOF on the header byte is distinguished from a genuine error via
//! [`read_message`]'s `Ok(None)` return.

mod error;
mod header;
mod io;
mod message;

pub use error::FramingError;
pub use header::Header;
pub use io::{read_message, write_message};
pub use message::{Message, MessageType};
