use std::fs;
use std::path::Path;

use crate::bits::{BitReader, BitWriter};
use crate::error::DictionaryError;
use crate::trie::TrieNode;

/// The fixed file name the dictionary is loaded from in the server's
/// working directory.
pub const DICTIONARY_FILE_NAME: &str = "(sample)compression.dict";

const ALPHABET_SIZE: usize = 256;

/// A loaded 256-entry variable-length code table, ready to encode and decode
/// payloads.
///
/// Construct with [`Dictionary::load`]. The dictionary is immutable once
/// built and is shared read-only across every connection the server
/// handles.
pub struct Dictionary {
    codes: Vec<Vec<bool>>,
    root: TrieNode,
}

impl Dictionary {
    /// Loads a dictionary from `path`.
    ///
    /// The file is read as a flat bitstream: for each byte value `0..=255`
    /// in order, 8 bits give the code length `L`, followed by `L` bits
    /// giving the code itself. Trailing bits beyond the 256th entry are
    /// ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parses a dictionary directly from an in-memory buffer, matching the
    /// on-disk layout described in [`Dictionary::load`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let mut reader = BitReader::new(bytes);
        let mut codes = Vec::with_capacity(ALPHABET_SIZE);
        let mut root = TrieNode::empty_branch();

        for value in 0..ALPHABET_SIZE {
            let len = reader
                .read_length_byte()
                .ok_or_else(|| eof_error(&reader, 8))?;
            let code = if len == 0 {
                Vec::new()
            } else {
                reader
                    .read_bits(len)
                    .ok_or_else(|| eof_error(&reader, len as usize))?
            };
            root.insert(&code, value as u8);
            codes.push(code);
        }

        Ok(Self { codes, root })
    }

    /// Encodes `payload` into a bit-packed buffer.
    ///
    /// The output always ends with one extra byte holding the number of
    /// padding bits (`0..=7`) added to the final byte, so the result is
    /// never empty even for an empty payload.
    #[must_use]
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for &byte in payload {
            writer.push_code(&self.codes[byte as usize]);
        }
        let (mut out, pad) = writer.finish();
        out.push(pad);
        out
    }

    /// Decodes a buffer previously produced by [`Dictionary::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::CorruptCompressed`] if a bit sequence
    /// never matches a code in the trie (the dictionary is not prefix-free,
    /// or `data` is not a valid encoding).
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, DictionaryError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let pad = data[data.len() - 1] as usize;
        let body = &data[..data.len() - 1];
        let total_bits = body.len() * 8;
        let significant_bits = total_bits.saturating_sub(pad);

        let mut reader = BitReader::new(body);
        let mut out = Vec::new();
        let mut node = &self.root;

        while reader.position() < significant_bits {
            let bit = reader
                .read_bit()
                .ok_or(DictionaryError::CorruptCompressed)?;
            node = node.step(bit).ok_or(DictionaryError::CorruptCompressed)?;
            if let Some(byte) = node.leaf_byte() {
                out.push(byte);
                node = &self.root;
            }
        }

        Ok(out)
    }
}

fn eof_error(reader: &BitReader<'_>, needed: usize) -> DictionaryError {
    DictionaryError::UnexpectedEof {
        expected_bits: reader.position() + needed,
        available_bits: reader.total_bits(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders `value`'s low `len` bits, most-significant first, as the bit
    /// vector form `push_code` and `insert` now take.
    fn bits_msb(len: u8, value: u64) -> Vec<bool> {
        (0..len).rev().map(|i| (value >> i) & 1 != 0).collect()
    }

    /// Builds a dictionary file covering all 256 bytes with a valid,
    /// uniquely decodable code: byte `0` gets the 1-bit code `0`; every
    /// other byte `v` gets the 9-bit code `1` followed by `v`'s 8-bit
    /// pattern. This deliberately leaves the 9-bit pattern `1 00000000`
    /// (which would collide with byte `0`'s own pattern) unassigned,
    /// giving the corrupt-payload test a genuine gap to walk into.
    fn full_dictionary_bytes() -> Vec<u8> {
        let mut writer = BitWriter::new();
        writer.push_code(&bits_msb(8, 1));
        writer.push_code(&bits_msb(1, 0b0));
        for value in 1u16..256 {
            writer.push_code(&bits_msb(8, 9));
            writer.push_code(&bits_msb(9, 0b1_0000_0000 | value as u64));
        }
        writer.finish().0
    }

    /// Builds a dictionary where byte `0` gets a 1-bit code and every other
    /// byte gets a 100-bit code (`1` followed by 99 bits of the byte's index,
    /// zero-extended) — well past the 64-bit width a `u64`-packed code could
    /// ever represent, exercising the documented `L ∈ [0,255]` range.
    fn wide_code_dictionary_bytes() -> Vec<u8> {
        let mut writer = BitWriter::new();
        writer.push_code(&bits_msb(8, 1));
        writer.push_code(&bits_msb(1, 0b0));
        for value in 1u16..256 {
            writer.push_code(&bits_msb(8, 100));
            let mut code = vec![true];
            code.extend(bits_msb(99, value as u64));
            writer.push_code(&code);
        }
        writer.finish().0
    }

    #[test]
    fn round_trips_arbitrary_payload() {
        let dict = Dictionary::from_bytes(&full_dictionary_bytes()).unwrap();
        let payload = b"the quick brown fox jumps over 13 lazy dogs!\0\x01\xff";
        let encoded = dict.encode(payload);
        let decoded = dict.decode(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn encoded_output_always_has_trailing_padding_byte() {
        let dict = Dictionary::from_bytes(&full_dictionary_bytes()).unwrap();
        let encoded = dict.encode(b"");
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0], 0);
        assert_eq!(dict.decode(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        let dict = Dictionary::from_bytes(&full_dictionary_bytes()).unwrap();
        // "1" followed by byte 0's own 8-bit pattern was never assigned to
        // any byte, so the trie walk runs off the end of the branch.
        let mut writer = BitWriter::new();
        writer.push_code(&bits_msb(9, 0b1_0000_0000));
        let (body, pad) = writer.finish();
        let mut encoded = body;
        encoded.push(pad);
        let err = dict.decode(&encoded).unwrap_err();
        assert!(matches!(err, DictionaryError::CorruptCompressed));
    }

    #[test]
    fn round_trips_payload_with_codes_longer_than_64_bits() {
        let dict = Dictionary::from_bytes(&wide_code_dictionary_bytes()).unwrap();
        let payload = b"wide codes still round-trip correctly\0\xff";
        let encoded = dict.encode(payload);
        assert_eq!(dict.decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn truncated_dictionary_file_is_rejected() {
        let err = Dictionary::from_bytes(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, DictionaryError::UnexpectedEof { .. }));
    }
}
