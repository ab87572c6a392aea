use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::{Config, Limits, Site};
use crate::error::ServerError;
use crate::http::connection::Connection;
use crate::http::mime;
use crate::pipeline::Pipeline;

/// Accepts connections and hands each one to its own task.
pub struct Server<P> {
    config: Config,
    pipeline: Arc<P>,
}

/// Control over a started server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl<P: Pipeline> Server<P> {
    pub fn new(config: Config, pipeline: P) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Binds `0.0.0.0:<port>` and starts the accept loop on its own task.
    pub async fn start(self) -> anyhow::Result<ServerHandle> {
        mime::init();

        let site = Arc::new(Site::from_config(&self.config.site)?);
        let limits = Limits::from(&self.config.limits);
        let backoff = Duration::from_millis(self.config.server.accept_backoff_ms);

        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.server.port));
        let listener = bind_exclusive(addr, self.config.server.backlog)
            .with_context(|| format!("failed to bind {addr}"))?;
        let local_addr = listener.local_addr()?;

        info!(
            address = %local_addr,
            root = %site.physical_dir().display(),
            "Serving HTTP"
        );

        let running = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());

        let accept_task = tokio::spawn(accept_loop(
            listener,
            site,
            limits,
            self.pipeline,
            Arc::clone(&running),
            Arc::clone(&shutdown),
            backoff,
        ));

        Ok(ServerHandle {
            local_addr,
            running,
            shutdown,
            accept_task,
        })
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops accepting and closes the listening socket. Connections already
    /// accepted run to completion on their own.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!(address = %self.local_addr, "Stopping listener");
            self.shutdown.notify_one();
        }
    }

    /// Waits for the accept loop to exit.
    pub async fn wait(self) -> anyhow::Result<()> {
        self.accept_task
            .await
            .context("accept loop panicked")
    }
}

/// Binds with address reuse off and the given backlog.
fn bind_exclusive(addr: SocketAddr, backlog: i32) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(false)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    socket.set_nonblocking(true)?;

    TcpListener::from_std(socket.into())
}

async fn accept_loop<P: Pipeline>(
    listener: TcpListener,
    site: Arc<Site>,
    limits: Limits,
    pipeline: Arc<P>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    backoff: Duration,
) {
    while running.load(Ordering::SeqCst) {
        let accepted = tokio::select! {
            res = listener.accept() => res,
            _ = shutdown.notified() => break,
        };

        let (socket, peer) = match accepted {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "Failed to accept connection");
                tokio::time::sleep(backoff).await;
                continue;
            }
        };

        if !running.load(Ordering::SeqCst) {
            break;
        }

        let local = match socket.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "Dropping connection without local address");
                continue;
            }
        };
        tracing::debug!(peer = %peer, "Accepted connection");

        let site = Arc::clone(&site);
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            let conn = Connection::new(socket, peer, local, limits);
            match conn.run(&site, &*pipeline).await {
                Ok(()) => {}
                Err(e @ ServerError::ConnectionFault(_)) | Err(e @ ServerError::Pipeline(_)) => {
                    tracing::warn!(peer = %peer, error = %e, "Connection failed");
                }
                Err(e) => {
                    tracing::debug!(peer = %peer, error = %e, "Request rejected");
                }
            }
        });
    }

    info!("Listener closed");
}
