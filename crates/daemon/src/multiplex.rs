use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::os::unix::pipe::{pipe, PipeReader, PipeWriter};
use std::sync::{Arc, Mutex};

/// A single in-flight coalesced file retrieval.
///
/// The coordinator (the connection that first registers this session)
/// partitions the requested byte range across itself and however many
/// peers join before it finishes partitioning, then hands each peer its
/// sub-range over a real kernel pipe: one 16-byte `(offset, length)` record
/// per peer, written in the order peers are expected to read them. Peers
/// block on their `read` until the coordinator writes, exactly as a pipe
/// read blocks on an empty pipe with the write end still open.
pub struct Session {
    id: u32,
    filename: String,
    offset: u64,
    length: u64,
    num_peers: Mutex<u32>,
    writer: Mutex<PipeWriter>,
    reader: Mutex<PipeReader>,
}

/// Size in bytes of one sub-range record written down the session pipe.
const RECORD_LEN: usize = 16;

impl Session {
    fn new(id: u32, filename: String, offset: u64, length: u64) -> io::Result<Self> {
        let (reader, writer) = pipe()?;
        Ok(Self {
            id,
            filename,
            offset,
            length,
            num_peers: Mutex::new(0),
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
        })
    }

    /// The session id a client chose for this retrieval.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// True if `filename`/`offset`/`length` match the request that created
    /// this session. A mismatch means two connections picked the same
    /// session id for unrelated retrievals.
    pub fn matches(&self, filename: &str, offset: u64, length: u64) -> bool {
        self.filename == filename && self.offset == offset && self.length == length
    }

    /// Registers the calling connection as a peer and returns the peer
    /// count observed immediately after joining (1 for the first peer to
    /// join, and so on). Called by every connection that finds an existing
    /// session under this id, never by the coordinator that created it.
    pub fn join_as_peer(&self) -> u32 {
        let mut count = self.num_peers.lock().unwrap();
        *count += 1;
        *count
    }

    /// Number of peers that had joined at the moment the coordinator reads
    /// this value, used to size the partition.
    pub fn peer_count(&self) -> u32 {
        *self.num_peers.lock().unwrap()
    }

    /// Writes one `(sub_offset, sub_length)` record for a peer to read.
    /// Called by the coordinator only, once per peer, in order.
    pub fn send_subrange(&self, sub_offset: u64, sub_length: u64) -> io::Result<()> {
        let mut record = [0u8; RECORD_LEN];
        record[..8].copy_from_slice(&sub_offset.to_be_bytes());
        record[8..].copy_from_slice(&sub_length.to_be_bytes());
        self.writer.lock().unwrap().write_all(&record)
    }

    /// Blocks until the coordinator writes this peer's sub-range and
    /// returns it. Called by a peer exactly once.
    pub fn recv_subrange(&self) -> io::Result<(u64, u64)> {
        let mut record = [0u8; RECORD_LEN];
        self.reader.lock().unwrap().read_exact(&mut record)?;
        let sub_offset = u64::from_be_bytes(record[..8].try_into().unwrap());
        let sub_length = u64::from_be_bytes(record[8..].try_into().unwrap());
        Ok((sub_offset, sub_length))
    }
}

/// Splits `[offset, offset + length)` into `num_peers + 1` contiguous
/// sub-ranges, distributing the remainder one extra byte at a time to the
/// first sub-ranges. Returns one entry per peer followed by the
/// coordinator's own share as the last entry.
pub fn partition(offset: u64, length: u64, num_peers: u32) -> Vec<(u64, u64)> {
    let shares = u64::from(num_peers) + 1;
    let base = length / shares;
    let remainder = length % shares;
    let mut out = Vec::with_capacity(shares as usize);
    let mut cursor = offset;
    for i in 0..shares {
        let share_len = if i < remainder { base + 1 } else { base };
        out.push((cursor, share_len));
        cursor += share_len;
    }
    out
}

/// Table of in-flight retrieval sessions keyed by client-chosen session id.
///
/// A real server process serves many concurrent connections from the
/// thread pool; this table is the only state shared between them for the
/// coalescing feature, so every operation takes a single lock around a plain
/// `HashMap`. Session bodies themselves are cheap (one pipe, one counter),
/// so contention is limited to the brief add/find/remove calls, never to
/// the blocking pipe I/O which happens after the lock is released.
pub struct MultiplexTable {
    sessions: Mutex<HashMap<u32, Arc<Session>>>,
}

impl MultiplexTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a new coordinator session. Returns `None` if `session_id`
    /// is already in use by another in-flight retrieval.
    pub fn register(
        &self,
        session_id: u32,
        filename: String,
        offset: u64,
        length: u64,
    ) -> io::Result<Option<Arc<Session>>> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session_id) {
            return Ok(None);
        }
        let session = Arc::new(Session::new(session_id, filename, offset, length)?);
        sessions.insert(session_id, Arc::clone(&session));
        Ok(Some(session))
    }

    /// Looks up an in-flight session by id.
    pub fn find(&self, session_id: u32) -> Option<Arc<Session>> {
        self.sessions.lock().unwrap().get(&session_id).cloned()
    }

    /// Removes a session once its coordinator has finished partitioning and
    /// served its own share.
    pub fn remove(&self, session_id: u32) {
        self.sessions.lock().unwrap().remove(&session_id);
    }
}

impl Default for MultiplexTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_distributes_remainder_to_leading_shares() {
        let shares = partition(100, 10, 2);
        assert_eq!(shares, vec![(100, 4), (104, 3), (107, 3)]);
    }

    #[test]
    fn partition_with_no_peers_is_the_whole_range() {
        assert_eq!(partition(0, 50, 0), vec![(0, 50)]);
    }

    #[test]
    fn register_rejects_duplicate_session_id() {
        let table = MultiplexTable::new();
        table
            .register(1, "a.txt".into(), 0, 10)
            .expect("io")
            .expect("first registration succeeds");
        let second = table.register(1, "b.txt".into(), 0, 5).expect("io");
        assert!(second.is_none());
    }

    #[test]
    fn find_matches_registered_session() {
        let table = MultiplexTable::new();
        table.register(7, "a.txt".into(), 0, 10).unwrap().unwrap();
        let found = table.find(7).expect("present");
        assert!(found.matches("a.txt", 0, 10));
        assert!(!found.matches("a.txt", 1, 10));
    }

    #[test]
    fn remove_forgets_the_session() {
        let table = MultiplexTable::new();
        table.register(3, "a.txt".into(), 0, 10).unwrap().unwrap();
        table.remove(3);
        assert!(table.find(3).is_none());
    }

    #[test]
    fn subrange_round_trips_through_the_pipe() {
        let session = Session::new(1, "a.txt".into(), 0, 100).expect("session");
        session.send_subrange(10, 20).expect("send");
        assert_eq!(session.recv_subrange().expect("recv"), (10, 20));
    }
}
