//! Structured logging bootstrap for the server binary.
//!
//! This crate has exactly one entry point, [`init`], which installs a
//! [`tracing`] subscriber reading its filter from the `RUST_LOG`
//! environment variable (defaulting to `info`). The protocol itself has no
//! environment-variable surface — see the daemon's config file format —
//! but ambient diagnostic verbosity is a separate, ordinary concern and is
//! controlled the usual `tracing-subscriber` way.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// Safe to call once per process; a second call is a no-op (the underlying
/// `tracing` global dispatcher can only be set once, and `try_init` simply
/// reports that failure without panicking).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
