use std::fs;
use std::net::TcpStream;

use protocol::{Header, MessageType};

use super::{maybe_compress, send_error, Outcome};
use crate::server::ServerContext;

/// Handles a `DirList` request: lists the regular files directly inside the
/// served directory as a byte string with each name terminated by a NUL
/// byte. A directory with no regular files replies with a single NUL byte.
///
/// Subdirectories and anything that isn't a plain file (symlinks, sockets,
/// device nodes) are skipped, since the retrieval protocol only ever serves
/// files directly inside the root.
pub(super) fn handle(stream: &mut TcpStream, ctx: &ServerContext, header: Header) -> std::io::Result<Outcome> {
    let entries = match fs::read_dir(&ctx.directory) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(%err, directory = %ctx.directory.display(), "cannot list served directory");
            send_error(stream)?;
            return Ok(Outcome::Close);
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => names.push(entry.file_name()),
            _ => continue,
        }
    }

    let mut payload = Vec::new();
    if names.is_empty() {
        payload.push(0);
    }
    for name in &names {
        payload.extend_from_slice(name.to_string_lossy().as_bytes());
        payload.push(0);
    }

    let reply_payload = maybe_compress(ctx, header.requires_compression, payload);
    protocol::write_message(
        stream,
        Header::new(MessageType::DirListReply, header.requires_compression, false),
        &reply_payload,
    )
    .map_err(std::io::Error::other)?;
    Ok(Outcome::Continue)
}
