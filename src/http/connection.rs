use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::config::{Config, LimitsConfig};
use crate::http::parser::{Classifier, Outcome};
use crate::http::reader::{HeaderRead, read_header};
use crate::http::response::{Response, StatusCode};
use crate::http::transfer::send_file;
use crate::http::writer::ResponseWriter;

/// Upper bound on request bytes discarded after answering an oversized header.
const MAX_DRAIN_BYTES: usize = 64 * 1024;

/// Upper bound on time spent discarding them.
const MAX_DRAIN_TIME: Duration = Duration::from_secs(2);

/// Whether a connection error came from the socket (or file) rather than
/// from one of the per-connection deadlines.
pub fn is_transport_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<std::io::Error>())
}

/// Whether a connection error is an expired read or write deadline.
pub fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<Elapsed>())
}

/// Immutable data shared by every connection.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub classifier: Classifier,
    pub root: PathBuf,
    pub limits: LimitsConfig,
}

impl ConnectionContext {
    pub fn new(classifier: Classifier, root: impl Into<PathBuf>, limits: LimitsConfig) -> Self {
        Self {
            classifier,
            root: root.into(),
            limits,
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let classifier = Classifier::new().context("Failed to compile request grammars")?;
        Ok(Self::new(classifier, cfg.files.root.clone(), cfg.limits.clone()))
    }
}

pub enum ConnectionState {
    Reading,
    Classified(Outcome),
    Responded(StatusCode),
}

/// One request/response exchange on an accepted stream.
pub struct Connection<S> {
    stream: S,
    ctx: Arc<ConnectionContext>,
    state: ConnectionState,
    drain_before_close: bool,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ConnectionContext>) -> Self {
        Self {
            stream,
            ctx,
            state: ConnectionState::Reading,
            drain_before_close: false,
        }
    }

    /// Drives the connection to `Responded` and returns the status that was
    /// sent. The write half is shut down before returning; there is no
    /// keep-alive. Failed shutdowns after a complete response are not errors.
    pub async fn run(&mut self) -> anyhow::Result<StatusCode> {
        loop {
            match &self.state {
                ConnectionState::Reading => {
                    let outcome = self.read_and_classify().await?;
                    self.state = ConnectionState::Classified(outcome);
                }

                ConnectionState::Classified(outcome) => {
                    let outcome = outcome.clone();
                    let status = self.respond(&outcome).await?;
                    self.state = ConnectionState::Responded(status);
                }

                ConnectionState::Responded(status) => {
                    let status = *status;
                    self.close().await;
                    return Ok(status);
                }
            }
        }
    }

    async fn read_and_classify(&mut self) -> anyhow::Result<Outcome> {
        let limits = &self.ctx.limits;
        let header = match timeout(limits.read_timeout(), read_header(&mut self.stream, limits)).await {
            Ok(header) => header?,
            Err(elapsed) => {
                tracing::warn!(
                    timeout_ms = limits.read_timeout_ms,
                    "Timed out waiting for request header"
                );
                return Err(elapsed).context("timed out waiting for request header");
            }
        };

        let (request, outcome) = match &header {
            HeaderRead::Oversized(text) => {
                tracing::warn!(buffered = text.len(), "Request header exceeds size limit");
                self.drain_before_close = true;
                (None, Outcome::BadRequest)
            }
            HeaderRead::Complete(text) | HeaderRead::Closed(text) => {
                self.ctx.classifier.classify_request(text)
            }
        };

        tracing::info!(
            method = ?request.as_ref().map(|r| r.method),
            path = request.as_ref().map(|r| r.target_path.as_str()).unwrap_or("-"),
            outcome = ?outcome,
            "Request classified"
        );
        Ok(outcome)
    }

    async fn respond(&mut self, outcome: &Outcome) -> anyhow::Result<StatusCode> {
        let write_timeout = self.ctx.limits.write_timeout();

        match outcome {
            Outcome::BadRequest => {
                ResponseWriter::new(&Response::bad_request())
                    .write_to_stream(&mut self.stream, write_timeout)
                    .await?;
                Ok(StatusCode::BadRequest)
            }

            Outcome::NotFound => {
                ResponseWriter::new(&Response::not_found())
                    .write_to_stream(&mut self.stream, write_timeout)
                    .await?;
                Ok(StatusCode::NotFound)
            }

            Outcome::Success { filename } => {
                let path = self.ctx.root.join(filename);
                let transfer = send_file(&mut self.stream, &path, &self.ctx.limits).await?;
                tracing::info!(file = %filename, result = ?transfer, "File transfer finished");
                Ok(transfer.status_code())
            }
        }
    }

    /// Sends FIN after the response. When the client was cut off mid-header,
    /// also reads and discards what it is still sending, so closing does not
    /// turn into a reset that destroys the response in flight.
    async fn close(&mut self) {
        match timeout(self.ctx.limits.write_timeout(), self.stream.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Shutdown failed"),
            Err(_) => tracing::debug!("Shutdown timed out"),
        }

        if !self.drain_before_close {
            return;
        }

        let deadline = self.ctx.limits.read_timeout().min(MAX_DRAIN_TIME);
        let mut scratch = [0u8; 1024];
        let mut drained = 0;

        let drain = async {
            while drained < MAX_DRAIN_BYTES {
                match self.stream.read(&mut scratch).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => drained += n,
                }
            }
        };
        let finished = timeout(deadline, drain).await.is_ok();
        tracing::debug!(drained, finished, "Discarded unread request bytes");
    }
}
