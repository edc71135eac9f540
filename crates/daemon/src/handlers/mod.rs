mod dir;
mod echo;
mod retrieve;
mod size;

use std::net::TcpStream;

use protocol::{Header, Message, MessageType};

use crate::pool::Pool;
use crate::server::ServerContext;

/// What the connection loop should do after a handler returns.
pub enum Outcome {
    /// Read the next message on the same connection.
    Continue,
    /// Close the connection; no further messages will be read.
    Close,
    /// The pool has been told to shut down; close this connection too.
    Shutdown,
}

/// Routes one parsed message to its handler.
///
/// Request types are handled by name; anything else (an out-of-range nibble,
/// or a reply type arriving as a request) gets a bare `0xF` error reply and
/// the connection is closed, matching the framing table's treatment of
/// unrecognised requests.
pub fn dispatch(
    stream: &mut TcpStream,
    ctx: &ServerContext,
    pool: &Pool,
    message: Message,
) -> std::io::Result<Outcome> {
    let Message { header, payload } = message;
    match header.message_type {
        MessageType::Echo => echo::handle(stream, ctx, header, payload),
        MessageType::DirList => dir::handle(stream, ctx, header),
        MessageType::FileSize => size::handle(stream, ctx, header, payload),
        MessageType::FileRetrieve => retrieve::handle(stream, ctx, header, payload),
        MessageType::Shutdown => {
            tracing::info!("shutdown requested");
            pool.shutdown();
            if let Err(err) = ctx.control.shutdown(std::net::Shutdown::Both) {
                tracing::warn!(%err, "failed to half-close listening socket");
            }
            Ok(Outcome::Shutdown)
        }
        other => {
            tracing::warn!(kind = ?other, "rejecting request of non-request type");
            send_error(stream)?;
            Ok(Outcome::Close)
        }
    }
}

/// Writes a bare `0xF` error reply with an empty payload.
pub(crate) fn send_error(stream: &mut TcpStream) -> std::io::Result<()> {
    protocol::write_message(stream, Header::new(MessageType::Error, false, false), &[])
        .map_err(std::io::Error::other)
}

/// Compresses `payload` if the reply is required to be compressed,
/// otherwise returns it unchanged.
pub(crate) fn maybe_compress(ctx: &ServerContext, requires_compression: bool, payload: Vec<u8>) -> Vec<u8> {
    if requires_compression {
        ctx.dictionary.encode(&payload)
    } else {
        payload
    }
}

/// Splits a NUL-terminated filename off the front of `payload`, returning
/// the filename and the rest of the bytes after the terminator. Treats a
/// missing terminator as "the whole remainder is the filename".
pub(crate) fn split_nul_terminated(payload: &[u8]) -> (&[u8], &[u8]) {
    match payload.iter().position(|&b| b == 0) {
        Some(idx) => (&payload[..idx], &payload[idx + 1..]),
        None => (payload, &[]),
    }
}
