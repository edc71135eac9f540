use std::net::TcpStream;

use protocol::{Header, MessageType};

use super::{maybe_compress, send_error, Outcome};
use crate::server::ServerContext;

/// Handles an `Echo` request.
///
/// The reply payload always matches the bytes the client logically sent,
/// adjusted only for the compression flags it asked for:
///
/// - `requires_compression` set, request already `compressed`: the client
///   pre-compressed the body itself and wants it back compressed — forward
///   the bytes unchanged.
/// - `requires_compression` set, request plain: compress before replying.
/// - `requires_compression` clear, request `compressed`: decompress before
///   replying, since the client asked for a plain reply.
/// - neither flag set: forward unchanged.
pub(super) fn handle(
    stream: &mut TcpStream,
    ctx: &ServerContext,
    header: Header,
    payload: Vec<u8>,
) -> std::io::Result<Outcome> {
    let reply_payload = if header.requires_compression && header.compressed {
        payload
    } else if header.requires_compression {
        maybe_compress(ctx, true, payload)
    } else if header.compressed {
        match ctx.dictionary.decode(&payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(%err, "rejecting echo with corrupt compressed body");
                send_error(stream)?;
                return Ok(Outcome::Close);
            }
        }
    } else {
        payload
    };

    protocol::write_message(
        stream,
        Header::new(MessageType::EchoReply, header.requires_compression, false),
        &reply_payload,
    )
    .map_err(std::io::Error::other)?;
    Ok(Outcome::Continue)
}
