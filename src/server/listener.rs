use anyhow::Context;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{Instrument, info};

use crate::config::{Config, IoErrorPolicy};
use crate::http::connection::{Connection, ConnectionContext, is_timeout, is_transport_error};

/// Binds `host:port`, moving on to the next port while the current one is
/// already in use. Any other bind error is returned immediately.
pub async fn bind(host: &str, port: u16, max_attempts: u16) -> anyhow::Result<TcpListener> {
    let mut port = port;

    for _ in 0..max_attempts.max(1) {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port in use, trying the next one");
                port = port
                    .checked_add(1)
                    .context("Ran out of port numbers while looking for a free port")?;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to bind {}:{}", host, port));
            }
        }
    }

    Err(anyhow::anyhow!(
        "No free port found after {} attempts",
        max_attempts.max(1)
    ))
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let ctx = Arc::new(ConnectionContext::from_config(cfg)?);
    let listener = bind(&cfg.server.host, cfg.server.port, cfg.server.max_port_attempts).await?;

    let port = listener.local_addr()?.port();
    println!("Using port: {}", port);
    info!(host = %cfg.server.host, port, root = %cfg.files.root.display(), "Listening");

    serve(listener, ctx, cfg.io_error_policy).await
}

/// Accepts connections forever, one task per connection.
///
/// Returns only when accepting fails, or, under [`IoErrorPolicy::Terminate`],
/// when any connection hits a socket read or write error. Expired deadlines
/// only ever close their own connection.
pub async fn serve(
    listener: TcpListener,
    ctx: Arc<ConnectionContext>,
    policy: IoErrorPolicy,
) -> anyhow::Result<()> {
    let (fatal_tx, mut fatal_rx) = mpsc::channel::<anyhow::Error>(1);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted.context("accept failed")?;
                info!("Accepted connection from {}", peer);

                let ctx = ctx.clone();
                let fatal_tx = fatal_tx.clone();
                let span = tracing::info_span!("connection", %peer);

                tokio::spawn(async move {
                    let mut conn = Connection::new(socket, ctx);
                    match conn.run().await {
                        Ok(status) => {
                            tracing::debug!(status = status.as_u16(), "Closing connection");
                        }
                        Err(e) if is_timeout(&e) => {
                            tracing::warn!("Connection from {} timed out: {:#}", peer, e);
                        }
                        Err(e) => {
                            tracing::error!("Connection error from {}: {:#}", peer, e);
                            if policy == IoErrorPolicy::Terminate && is_transport_error(&e) {
                                let _ = fatal_tx.send(e).await;
                            }
                        }
                    }
                }.instrument(span));
            }

            Some(e) = fatal_rx.recv() => {
                return Err(e.context("Stopping server after connection I/O error"));
            }
        }
    }
}
