use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::net::TcpStream;
use std::str;

use protocol::{Header, MessageType};

use super::{maybe_compress, send_error, split_nul_terminated, Outcome};
use crate::multiplex::partition;
use crate::server::ServerContext;

/// Handles a `FileRetrieve` request.
///
/// Wire payload: `session_id(4) offset(8) length(8) filename\0`.
///
/// The first connection to register a given `session_id` becomes the
/// coordinator: it looks up how many peers have joined by the time it reads
/// the table, splits `[offset, offset + length)` into that many peer shares
/// plus its own, hands each peer share down the session's pipe, serves its
/// own share, then removes the session. Every later connection that reuses
/// the same `session_id` is a peer: it blocks on the pipe for its share and
/// serves only that.
pub(super) fn handle(
    stream: &mut TcpStream,
    ctx: &ServerContext,
    header: Header,
    payload: Vec<u8>,
) -> std::io::Result<Outcome> {
    let Some(request) = parse_request(&payload) else {
        tracing::warn!("rejecting malformed file retrieve request");
        send_error(stream)?;
        return Ok(Outcome::Continue);
    };

    let path = match crate::path::resolve(&ctx.directory, &request.filename) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(%err, "rejecting file retrieve request");
            send_error(stream)?;
            return Ok(Outcome::Continue);
        }
    };

    let file_len = match std::fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        _ => {
            tracing::warn!(filename = %request.filename, "file retrieve request for missing file");
            send_error(stream)?;
            return Ok(Outcome::Continue);
        }
    };

    if request
        .offset
        .checked_add(request.length)
        .is_none_or(|end| end > file_len)
    {
        tracing::warn!(
            filename = %request.filename,
            offset = request.offset,
            length = request.length,
            file_len,
            "rejecting out-of-range file retrieve request"
        );
        send_error(stream)?;
        return Ok(Outcome::Close);
    }

    match ctx
        .sessions
        .register(request.session_id, request.filename.clone(), request.offset, request.length)
    {
        Ok(Some(session)) => {
            let peer_count = session.peer_count();
            let shares = partition(request.offset, request.length, peer_count);
            let (peer_shares, own_share) = shares.split_at(shares.len() - 1);
            for &(sub_offset, sub_length) in peer_shares {
                if let Err(err) = session.send_subrange(sub_offset, sub_length) {
                    tracing::warn!(%err, "failed to hand a peer its retrieval share");
                    ctx.sessions.remove(request.session_id);
                    return Err(err);
                }
            }
            let (sub_offset, sub_length) = own_share[0];
            let outcome = serve_subrange(stream, ctx, &header, &path, request.session_id, sub_offset, sub_length);
            ctx.sessions.remove(request.session_id);
            outcome
        }
        Ok(None) => {
            let Some(session) = ctx.sessions.find(request.session_id) else {
                // The coordinator already removed it between our failed
                // register and this lookup; nothing left to coalesce with.
                tracing::warn!(session_id = request.session_id, "session vanished before peer could join");
                send_error(stream)?;
                return Ok(Outcome::Close);
            };
            if !session.matches(&request.filename, request.offset, request.length) {
                tracing::warn!(session_id = request.session_id, "session id reused for a different retrieval");
                send_error(stream)?;
                return Ok(Outcome::Close);
            }
            session.join_as_peer();
            let (sub_offset, sub_length) = session.recv_subrange()?;
            serve_subrange(stream, ctx, &header, &path, request.session_id, sub_offset, sub_length)
        }
        Err(err) => {
            tracing::warn!(%err, "failed to open retrieval session pipe");
            Err(err)
        }
    }
}

struct Request {
    session_id: u32,
    offset: u64,
    length: u64,
    filename: String,
}

fn parse_request(payload: &[u8]) -> Option<Request> {
    if payload.len() < 20 {
        return None;
    }
    let session_id = u32::from_be_bytes(payload[0..4].try_into().unwrap());
    let offset = u64::from_be_bytes(payload[4..12].try_into().unwrap());
    let length = u64::from_be_bytes(payload[12..20].try_into().unwrap());
    let (filename_bytes, _) = split_nul_terminated(&payload[20..]);
    let filename = str::from_utf8(filename_bytes).ok()?.to_string();
    Some(Request {
        session_id,
        offset,
        length,
        filename,
    })
}

/// Reads `[sub_offset, sub_offset + sub_length)` out of the file at `path`
/// and replies with `session_id(4) sub_offset(8) sub_length(8) bytes`.
fn serve_subrange(
    stream: &mut TcpStream,
    ctx: &ServerContext,
    header: &Header,
    path: &std::path::Path,
    session_id: u32,
    sub_offset: u64,
    sub_length: u64,
) -> std::io::Result<Outcome> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(sub_offset))?;
    let mut bytes = vec![0u8; sub_length as usize];
    file.read_exact(&mut bytes)?;

    let mut body = Vec::with_capacity(20 + bytes.len());
    body.extend_from_slice(&session_id.to_be_bytes());
    body.extend_from_slice(&sub_offset.to_be_bytes());
    body.extend_from_slice(&sub_length.to_be_bytes());
    body.extend_from_slice(&bytes);

    let reply_payload = maybe_compress(ctx, header.requires_compression, body);
    protocol::write_message(
        stream,
        Header::new(MessageType::FileRetrieveReply, header.requires_compression, false),
        &reply_payload,
    )
    .map_err(std::io::Error::other)?;
    Ok(Outcome::Continue)
}
