use std::net::TcpStream;
use std::str;

use protocol::{Header, MessageType};

use super::{maybe_compress, send_error, split_nul_terminated, Outcome};
use crate::server::ServerContext;

/// Handles a `FileSize` request: `filename\0`, replies with the file's size
/// as an 8-byte big-endian integer.
///
/// A traversal attempt or a missing file both reply `0xF` and leave the
/// connection open for the next request — the client is presumed capable of
/// asking about a different file next.
pub(super) fn handle(
    stream: &mut TcpStream,
    ctx: &ServerContext,
    header: Header,
    payload: Vec<u8>,
) -> std::io::Result<Outcome> {
    let (filename_bytes, _) = split_nul_terminated(&payload);
    let Ok(filename) = str::from_utf8(filename_bytes) else {
        tracing::warn!("rejecting file size request with non-utf8 filename");
        send_error(stream)?;
        return Ok(Outcome::Continue);
    };

    let path = match crate::path::resolve(&ctx.directory, filename) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(%err, "rejecting file size request");
            send_error(stream)?;
            return Ok(Outcome::Continue);
        }
    };

    let metadata = match std::fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            tracing::warn!(filename, "file size request for missing file");
            send_error(stream)?;
            return Ok(Outcome::Continue);
        }
    };

    let reply_payload = maybe_compress(
        ctx,
        header.requires_compression,
        metadata.len().to_be_bytes().to_vec(),
    );
    protocol::write_message(
        stream,
        Header::new(MessageType::FileSizeReply, header.requires_compression, false),
        &reply_payload,
    )
    .map_err(std::io::Error::other)?;
    Ok(Outcome::Continue)
}
