//! Confirms messages can be read back to back off one stream, the way a
//! real connection serving several requests in a row would.

use std::io::Cursor;

use protocol::{read_message, write_message, Header, MessageType};

#[test]
fn three_messages_read_in_order_off_one_stream() {
    let mut wire = Vec::new();
    write_message(&mut wire, Header::new(MessageType::Echo, false, false), b"ping").unwrap();
    write_message(&mut wire, Header::new(MessageType::DirList, false, true), &[]).unwrap();
    write_message(&mut wire, Header::new(MessageType::Shutdown, false, false), &[]).unwrap();

    let mut cursor = Cursor::new(wire);

    let first = read_message(&mut cursor).unwrap().unwrap();
    assert_eq!(first.header.message_type, MessageType::Echo);
    assert_eq!(first.payload, b"ping");

    let second = read_message(&mut cursor).unwrap().unwrap();
    assert_eq!(second.header.message_type, MessageType::DirList);
    assert!(second.header.requires_compression);
    assert!(second.payload.is_empty());

    let third = read_message(&mut cursor).unwrap().unwrap();
    assert_eq!(third.header.message_type, MessageType::Shutdown);

    assert!(read_message(&mut cursor).unwrap().is_none());
}

#[test]
fn reply_after_request_round_trips_on_the_same_buffer() {
    let mut wire = Vec::new();
    write_message(&mut wire, Header::new(MessageType::FileSize, false, false), b"a.txt\0").unwrap();

    let mut cursor = Cursor::new(wire);
    let request = read_message(&mut cursor).unwrap().unwrap();
    assert_eq!(request.header.message_type, MessageType::FileSize);

    let mut reply_wire = Vec::new();
    write_message(
        &mut reply_wire,
        Header::new(MessageType::FileSizeReply, false, false),
        &42u64.to_be_bytes(),
    )
    .unwrap();
    let mut reply_cursor = Cursor::new(reply_wire);
    let reply = read_message(&mut reply_cursor).unwrap().unwrap();
    assert_eq!(reply.header.message_type, MessageType::FileSizeReply);
    assert_eq!(u64::from_be_bytes(reply.payload.try_into().unwrap()), 42);
}
