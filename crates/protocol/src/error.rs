use std::io;

use thiserror::Error;

/// Errors that can occur while reading or writing a framed message.
///
/// An out-of-range message type is not a framing error: [`crate::MessageType`]
/// parses every possible 4-bit value, falling back to
/// [`crate::MessageType::Unknown`] for ones it doesn't name. Rejecting those
/// is the daemon's dispatcher's job, not this crate's.
#[derive(Debug, Error)]
pub enum FramingError {
    /// The stream closed before a full length or payload could be read.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes the frame promised.
        expected: usize,
        /// Bytes actually available before EOF.
        actual: usize,
    },

    /// The underlying transport failed.
    #[error("transport I/O error")]
    Io(#[from] io::Error),
}
