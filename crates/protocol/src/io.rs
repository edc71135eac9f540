use std::io::{Read, Write};

use crate::error::FramingError;
use crate::header::Header;
use crate::message::Message;

/// Reads one framed message from `reader`.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly before
/// sending any header byte at all — this is the normal end of a session, not
/// an error. Any other short read (a partial length or a partial payload) is
/// reported as [`FramingError::ShortRead`].
///
/// Every message, including `Shutdown` and a type the caller will ultimately
/// reject, carries the same 9-byte header-plus-length prefix; the dispatcher
/// in the `daemon` crate is responsible for deciding which types carry a
/// meaningful payload.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Message>, FramingError> {
    let mut header_byte = [0u8; 1];
    let read = read_fill(reader, &mut header_byte)?;
    if read == 0 {
        return Ok(None);
    }

    let header = Header::from_byte(header_byte[0]);

    let mut length_bytes = [0u8; 8];
    read_exact(reader, &mut length_bytes)?;
    let length = u64::from_be_bytes(length_bytes) as usize;

    let mut payload = vec![0u8; length];
    read_exact(reader, &mut payload)?;

    Ok(Some(Message::new(header, payload)))
}

/// Writes one framed message to `writer` as a single buffer.
pub fn write_message<W: Write>(writer: &mut W, header: Header, payload: &[u8]) -> Result<(), FramingError> {
    let mut frame = Vec::with_capacity(1 + 8 + payload.len());
    frame.push(header.to_byte());
    frame.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    frame.extend_from_slice(payload);
    writer.write_all(&frame)?;
    Ok(())
}

/// Reads into `buf`, returning the number of bytes read before a clean EOF.
/// Used only for the very first header byte, where EOF is a valid outcome.
fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, FramingError> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..])? {
            0 => return Ok(total),
            n => total += n,
        }
    }
    Ok(total)
}

/// Reads exactly `buf.len()` bytes or fails with [`FramingError::ShortRead`].
fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), FramingError> {
    let total = read_fill(reader, buf)?;
    if total != buf.len() {
        return Err(FramingError::ShortRead {
            expected: buf.len(),
            actual: total,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageType;
    use std::io::Cursor;

    #[test]
    fn echo_plain_round_trips_literally() {
        // Scenario 1: client sends 00 00..00 05 "hello".
        let mut wire = Vec::new();
        wire.push(0x00);
        wire.extend_from_slice(&5u64.to_be_bytes());
        wire.extend_from_slice(b"hello");

        let mut cursor = Cursor::new(wire);
        let message = read_message(&mut cursor).unwrap().unwrap();
        assert_eq!(message.header.message_type, MessageType::Echo);
        assert_eq!(message.payload, b"hello");

        let mut out = Vec::new();
        write_message(
            &mut out,
            Header::new(MessageType::EchoReply, false, false),
            &message.payload,
        )
        .unwrap();
        let mut expected = vec![0x10];
        expected.extend_from_slice(&5u64.to_be_bytes());
        expected.extend_from_slice(b"hello");
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_stream_is_clean_eof() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(read_message(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn truncated_length_is_short_read() {
        let mut cursor = Cursor::new(vec![0x00, 0x00, 0x00]);
        let err = read_message(&mut cursor).unwrap_err();
        assert!(matches!(err, FramingError::ShortRead { .. }));
    }

    #[test]
    fn truncated_payload_is_short_read() {
        let mut wire = vec![0x00];
        wire.extend_from_slice(&5u64.to_be_bytes());
        wire.extend_from_slice(b"he");
        let mut cursor = Cursor::new(wire);
        let err = read_message(&mut cursor).unwrap_err();
        assert!(matches!(err, FramingError::ShortRead { .. }));
    }

    #[test]
    fn unknown_type_header_is_parsed_not_rejected_here() {
        // Scenario 5: header A0, length 0 — framing layer just parses it;
        // rejecting unknown types is the dispatcher's job.
        let mut wire = vec![0xA0];
        wire.extend_from_slice(&0u64.to_be_bytes());
        let mut cursor = Cursor::new(wire);
        let message = read_message(&mut cursor).unwrap().unwrap();
        assert_eq!(message.header.message_type, MessageType::Unknown(0xA));
        assert!(message.payload.is_empty());
    }
}
