use std::io;

use thiserror::Error;

/// Failure modes surfaced by the daemon crate.
///
/// Per-connection protocol failures (malformed frames, path traversal,
/// corrupt compressed bodies) are handled inline by the request handlers and
/// never reach this type — they become `0xF` replies or silent closes,
/// exactly as the wire-level failure table in the request handlers'
/// documentation specifies. `DaemonError` is reserved for failures that abort
/// startup or the accept loop itself.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The config file could not be read, or the listening socket could not
    /// be created, bound, or set to listen.
    #[error("daemon I/O failure")]
    Io(#[from] io::Error),

    /// The config file is shorter than the fixed 6-byte address/port header.
    #[error("config file truncated: {len} bytes, need at least 6")]
    TruncatedConfig {
        /// Number of bytes actually present in the config file.
        len: usize,
    },

    /// The compression dictionary failed to load.
    #[error("failed to load compression dictionary")]
    Dictionary(#[from] compress::DictionaryError),

    /// A requested filename escapes the served directory.
    #[error("filename `{0}` is not a plain entry of the served directory")]
    PathTraversal(String),
}
