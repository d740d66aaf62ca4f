use anyhow::Context;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";
const CRLF: &[u8] = b"\r\n";

pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(CRLF);
    }

    // Header/body separator
    buf.extend_from_slice(CRLF);

    // Body
    buf.extend_from_slice(&resp.body);
    if resp.body_as_line {
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(CRLF);
    }

    buf
}

/// Writes `buf` completely, retrying partial writes. Each individual write
/// must finish within `deadline`.
pub async fn write_fully<W>(stream: &mut W, buf: &[u8], deadline: Duration) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while written < buf.len() {
        let n = timeout(deadline, stream.write(&buf[written..]))
            .await
            .context("write timed out")?
            .context("write failed")?;

        if n == 0 {
            return Err(std::io::Error::from(std::io::ErrorKind::WriteZero))
                .context("connection closed while writing");
        }

        written += n;
    }

    Ok(())
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W, deadline: Duration) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        write_fully(stream, &self.buffer, deadline).await?;
        timeout(deadline, stream.flush())
            .await
            .context("flush timed out")?
            .context("flush failed")?;
        Ok(())
    }
}
