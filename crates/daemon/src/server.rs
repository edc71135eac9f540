use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use compress::Dictionary;
use socket2::{Domain, Protocol, Socket, Type};

use crate::config::ServerConfig;
use crate::error::DaemonError;
use crate::handlers;
use crate::multiplex::MultiplexTable;
use crate::pool::{Pool, QUEUE_CAPACITY, WORKER_COUNT};

/// Shared, read-only (or internally synchronized) state every worker thread
/// needs to serve a connection.
pub struct ServerContext {
    /// The loaded compression dictionary, shared across every connection.
    pub dictionary: Arc<Dictionary>,
    /// Directory this instance serves files from.
    pub directory: PathBuf,
    /// In-flight coalesced retrieval sessions.
    pub sessions: MultiplexTable,
    /// A second handle onto the listening socket, used only to half-close it
    /// from a worker thread on a `Shutdown` request.
    pub(crate) control: Socket,
}

/// A bound, not-yet-running server.
///
/// Binding and running are split so tests can bind to an ephemeral port
/// (`0`), read back the real port with [`Server::local_addr`], connect a
/// client, and only then start [`Server::run`] on a background thread.
pub struct Server {
    context: Arc<ServerContext>,
    pool: Arc<Pool>,
    listener: TcpListener,
}

impl Server {
    /// Binds the listening socket described by `config` and prepares shared
    /// server state. Does not accept connections yet.
    pub fn bind(config: ServerConfig, dictionary: Dictionary) -> Result<Self, DaemonError> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        let addr: SocketAddr = (config.bind_addr, config.bind_port).into();
        socket.bind(&addr.into())?;
        socket.listen(QUEUE_CAPACITY as i32)?;

        let control = socket.try_clone()?;
        let listener: TcpListener = socket.into();

        Ok(Self {
            context: Arc::new(ServerContext {
                dictionary: Arc::new(dictionary),
                directory: config.directory,
                sessions: MultiplexTable::new(),
                control,
            }),
            pool: Arc::new(Pool::new()),
            listener,
        })
    }

    /// Address the listening socket is actually bound to. Useful when
    /// `config.bind_port` was `0` and the kernel chose a port.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Spawns the fixed worker pool and runs the accept loop on the calling
    /// thread. Returns once a `Shutdown` request has half-closed the
    /// listening socket, the accept loop has observed it, and every worker
    /// has drained the queue and exited.
    pub fn run(self) -> Result<(), DaemonError> {
        let mut workers = Vec::with_capacity(WORKER_COUNT);
        for _ in 0..WORKER_COUNT {
            let pool = Arc::clone(&self.pool);
            let context = Arc::clone(&self.context);
            workers.push(thread::spawn(move || worker_loop(&pool, &context)));
        }

        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "accepted connection");
                    if !self.pool.push(stream) {
                        tracing::warn!(%peer, "dropping connection: queue is full");
                    }
                }
                Err(_) if self.pool.is_shutting_down() => {
                    tracing::info!("accept loop stopping for shutdown");
                    break;
                }
                Err(err) => {
                    tracing::warn!(%err, "accept failed");
                }
            }
        }

        self.pool.shutdown();
        for worker in workers {
            let _ = worker.join();
        }
        Ok(())
    }
}

fn worker_loop(pool: &Pool, context: &ServerContext) {
    while let Some(stream) = pool.pop() {
        handle_connection(stream, context, pool);
    }
}

fn handle_connection(mut stream: TcpStream, context: &ServerContext, pool: &Pool) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let span = tracing::info_span!("connection", peer = %peer);
    let _guard = span.enter();

    loop {
        let message = match protocol::read_message(&mut stream) {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(%err, "closing connection after framing error");
                break;
            }
        };

        match handlers::dispatch(&mut stream, context, pool, message) {
            Ok(handlers::Outcome::Continue) => continue,
            Ok(handlers::Outcome::Close) | Ok(handlers::Outcome::Shutdown) => break,
            Err(err) => {
                tracing::warn!(%err, "closing connection after I/O error");
                break;
            }
        }
    }
}
