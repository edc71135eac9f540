//! Exercises [`compress::Dictionary::load`] against a real file on disk,
//! mirroring how the daemon reads `(sample)compression.dict` at startup.

use compress::Dictionary;
use std::io::Write;

/// Builds a minimal 256-entry dictionary file: byte `0` gets a 1-bit code,
/// every other byte gets a 9-bit code formed from a leading `1` and its own
/// 8-bit pattern.
fn write_dictionary(path: &std::path::Path) {
    let mut bits = Vec::new();
    let mut push = |len: u32, code: u32| {
        for i in (0..len).rev() {
            bits.push(((code >> i) & 1) as u8);
        }
    };
    push(8, 1);
    push(1, 0);
    for value in 1u32..256 {
        push(8, 9);
        push(9, 0x100 | value);
    }
    while bits.len() % 8 != 0 {
        bits.push(0);
    }
    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for &bit in chunk {
            byte = (byte << 1) | bit;
        }
        bytes.push(byte);
    }
    std::fs::File::create(path)
        .unwrap()
        .write_all(&bytes)
        .unwrap();
}

#[test]
fn loads_dictionary_and_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("(sample)compression.dict");
    write_dictionary(&path);

    let dict = Dictionary::load(&path).expect("load dictionary");
    let payload = b"hello, coalesced world!";
    let encoded = dict.encode(payload);
    let decoded = dict.decode(&encoded).expect("decode");
    assert_eq!(decoded, payload);
}
