//! Entry point for the `rangefiled` server binary.
//!
//! Usage: `rangefiled <config-path>`. The config file is the fixed-width
//! binary format parsed by [`daemon::ServerConfig::from_path`]; there is no
//! other CLI surface; `RUST_LOG` is the only environment input this binary
//! reads, and it only controls log verbosity, not behavior.

use std::env;
use std::process::ExitCode;

use compress::{Dictionary, DICTIONARY_FILE_NAME};
use daemon::{Server, ServerConfig};

fn main() -> ExitCode {
    logging::init();

    let mut args = env::args_os().skip(1);
    let (Some(config_path), None) = (args.next(), args.next()) else {
        eprintln!("usage: rangefiled <config-path>");
        return ExitCode::FAILURE;
    };

    if let Err(err) = run(config_path) {
        tracing::error!(%err, "server exited with an error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(config_path: std::ffi::OsString) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_path(&config_path)?;
    let dictionary = Dictionary::load(DICTIONARY_FILE_NAME)?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        directory = %config.directory.display(),
        "starting server"
    );
    let server = Server::bind(config, dictionary)?;
    tracing::info!(local_addr = %server.local_addr()?, "listening");
    server.run()?;
    Ok(())
}
