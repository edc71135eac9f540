use std::collections::VecDeque;
use std::net::TcpStream;
use std::sync::{Condvar, Mutex};

/// Upper bound on the number of accepted connections waiting for a worker.
/// The original design sizes this to the kernel's own listen backlog so a
/// burst of clients that outruns the worker pool fails at the same point a
/// plain accept backlog would, rather than growing memory unboundedly.
pub const QUEUE_CAPACITY: usize = 1024;

/// Number of worker threads serving connections from the queue.
pub const WORKER_COUNT: usize = 20;

struct State {
    queue: VecDeque<TcpStream>,
    shutting_down: bool,
}

/// A bounded work queue of accepted connections, handed out to a fixed pool
/// of worker threads.
///
/// This is deliberately not a generic thread pool: it queues `TcpStream`s,
/// not closures, because the daemon has exactly one kind of work item. The
/// shutdown flag lives under the same lock as the queue so a worker waiting
/// on the condition variable can never miss a shutdown that raced with it
/// going to sleep.
pub struct Pool {
    state: Mutex<State>,
    not_empty: Condvar,
}

impl Pool {
    /// Creates an empty pool, not yet shutting down.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                shutting_down: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueues an accepted connection for a worker to pick up.
    ///
    /// Returns `false` without blocking if the queue is already at
    /// [`QUEUE_CAPACITY`]; the caller is expected to drop the connection in
    /// that case rather than block the acceptor thread.
    pub fn push(&self, stream: TcpStream) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.queue.len() >= QUEUE_CAPACITY {
            return false;
        }
        state.queue.push_back(stream);
        self.not_empty.notify_one();
        true
    }

    /// Blocks until a connection is available or the pool is shut down.
    /// Returns `None` immediately once shutdown has been requested, even if
    /// connections are still queued: shutdown means no further queued work
    /// is processed, not merely that no new work is accepted.
    pub fn pop(&self) -> Option<TcpStream> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.shutting_down {
                return None;
            }
            if let Some(stream) = state.queue.pop_front() {
                return Some(stream);
            }
            state = self.not_empty.wait(state).unwrap();
        }
    }

    /// Requests shutdown: drops every connection still waiting in the queue,
    /// then wakes every worker blocked in [`Pool::pop`] so each observes the
    /// flag and exits without picking up any more work. Workers that are
    /// already mid-connection keep serving it to completion; shutdown only
    /// stops queued work from being started.
    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        state.shutting_down = true;
        state.queue.clear();
        self.not_empty.notify_all();
    }

    /// True once shutdown has been requested.
    pub fn is_shutting_down(&self) -> bool {
        self.state.lock().unwrap().shutting_down
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
