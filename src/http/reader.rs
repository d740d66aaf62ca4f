use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::LimitsConfig;

/// Marks the end of the request header block.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Result of reading one request header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderRead {
    /// The terminator arrived; the text runs up to and including it.
    Complete(String),
    /// The peer closed the connection first; whatever arrived is kept.
    Closed(String),
    /// `max_header_bytes` was reached without seeing a terminator.
    Oversized(String),
}

impl HeaderRead {
    pub fn text(&self) -> &str {
        match self {
            HeaderRead::Complete(text) | HeaderRead::Closed(text) | HeaderRead::Oversized(text) => text,
        }
    }
}

/// Reads from `stream` until the header terminator, end of stream, or the
/// size limit. Bytes after the terminator are left unread or discarded.
///
/// No deadline is applied here; the caller wraps this in one.
pub async fn read_header<R>(stream: &mut R, limits: &LimitsConfig) -> anyhow::Result<HeaderRead>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(limits.read_buffer_size.max(1));
    let mut temp = vec![0u8; limits.read_buffer_size.max(1)];

    loop {
        let n = stream.read(&mut temp).await.context("read failed")?;

        if n == 0 {
            tracing::debug!(buffered = buffer.len(), "Peer closed before header terminator");
            return Ok(HeaderRead::Closed(lossy(&buffer)));
        }

        // The terminator may straddle the previous chunk boundary
        let search_from = buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        buffer.extend_from_slice(&temp[..n]);
        tracing::debug!(read = n, buffered = buffer.len(), "Read request bytes");

        if let Some(pos) = find_headers_end(&buffer[search_from..]) {
            let end = search_from + pos + HEADER_TERMINATOR.len();
            if end > limits.max_header_bytes {
                return Ok(HeaderRead::Oversized(lossy(&buffer[..end])));
            }
            return Ok(HeaderRead::Complete(lossy(&buffer[..end])));
        }

        if buffer.len() >= limits.max_header_bytes {
            return Ok(HeaderRead::Oversized(lossy(&buffer)));
        }
    }
}

pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
