use std::io;

use thiserror::Error;

/// Errors raised while loading the dictionary or decoding a compressed payload.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The dictionary file ended before all 256 code-length/code pairs could
    /// be read.
    #[error("dictionary file truncated: expected {expected_bits} bits, found {available_bits}")]
    UnexpectedEof {
        /// Bits required to read the remaining table entries.
        expected_bits: usize,
        /// Bits actually available in the file.
        available_bits: usize,
    },

    /// A bit sequence during decode did not match any code in the trie.
    #[error("corrupt compressed payload: bit sequence has no matching dictionary entry")]
    CorruptCompressed,

    /// Failed to read the dictionary file from disk.
    #[error("failed to read dictionary file")]
    Io(#[from] io::Error),
}
