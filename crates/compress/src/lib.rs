#![deny(missing_docs)]

//! # Overview
//!
//! `compress` implements the fixed, dictionary-driven byte codec used to
//! (optionally) compress every payload on the wire. Unlike a general-purpose
//! compressor, the dictionary is an external artifact: a 256-entry table of
//! variable-length prefix codes loaded once at startup from
//! `(sample)compression.dict` and shared read-only for the life of the
//! server.
//!
//! # Design
//!
//! [`Dictionary::load`] parses the code table and builds both the encode
//! side (a length + bit-pattern per byte value) and the decode side (a
//! binary trie walked one bit at a time). [`Dictionary::encode`] and
//! [`Dictionary::decode`] are the two codec entry points; both operate on
//! whole in-memory buffers, matching how the daemon uses them on a single
//! message payload at a time.
//!
//! # Invariants
//!
//! - The 256 codes loaded from the dictionary file must form a uniquely
//!   decodable (prefix) set. [`Dictionary::load`] does not itself verify
//!   this; [`Dictionary::decode`] can fail with
//!   [`DictionaryError::CorruptCompressed`] if a bit sequence falls off the
//!   trie, which happens either for genuinely corrupt input or a
//!   non-prefix-free dictionary.
//! - [`Dictionary::encode`]'s output always ends with one extra byte holding
//!   the number of padding bits (0..=7), so encoded output is never empty
//!   even for an empty input payload.
//!
//! # Errors
//!
//! Dictionary loading and decoding both report failures through
//! [`DictionaryError`].

mod bits;
mod dictionary;
mod error;
mod trie;

pub use dictionary::{Dictionary, DICTIONARY_FILE_NAME};
pub use error::DictionaryError;
