//! # Overview
//!
//! `daemon` is the concurrent server core: a bounded thread pool of blocking
//! workers, a request dispatcher per the wire protocol's six request types,
//! and the multiplex table that coalesces concurrent retrievals of the same
//! byte range into one set of disk reads.
//!
//! # Design
//!
//! [`Server::bind`] opens the listening socket and builds the shared
//! [`ServerContext`]; [`Server::run`] spawns a fixed pool of worker threads
//! (see [`pool`]) and blocks the calling thread in the accept loop. Each
//! worker pulls a connection off the pool's queue and serves it to
//! completion (EOF, close, or a `Shutdown` request) before asking for the
//! next one — there is no per-connection thread and no async runtime; this
//! mirrors a traditional thread-per-request-batch daemon rather than an
//! event loop.
//!
//! Coalesced retrieval lives in [`multiplex`]: the first connection to use a
//! given session id partitions the requested range across itself and
//! however many later connections (peers) join before it finishes, handing
//! each peer its share down a real kernel pipe.
//!
//! # Errors
//!
//! Startup failures (bad config, unreadable dictionary, unbindable socket)
//! are reported through [`DaemonError`]. Per-connection protocol failures
//! never propagate this far; they are handled entirely inside
//! [`handlers::dispatch`] as `0xF` replies or silent closes.

mod config;
mod error;
mod handlers;
mod multiplex;
mod path;
mod pool;
mod server;

pub use config::ServerConfig;
pub use error::DaemonError;
pub use server::{Server, ServerContext};
