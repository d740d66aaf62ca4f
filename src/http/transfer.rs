//! Streaming a validated file to the client.
//!
//! The file is stat'ed and opened only here. If either step fails the client
//! gets the full 404 response instead, so a file that disappears between
//! classification and transfer never leaves a half-written reply.

use anyhow::Context;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::http::mime::content_type_for;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::{ResponseWriter, write_fully};

/// Size and type of a file about to be served. Lives for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub content_type: &'static str,
}

/// What actually went out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// 200 with the whole file
    Sent { bytes: u64 },
    /// The file could not be stat'ed or opened; a 404 was sent
    Missing,
}

impl TransferStatus {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TransferStatus::Sent { .. } => StatusCode::Ok,
            TransferStatus::Missing => StatusCode::NotFound,
        }
    }
}

pub async fn send_file<W>(
    stream: &mut W,
    path: &Path,
    limits: &LimitsConfig,
) -> anyhow::Result<TransferStatus>
where
    W: AsyncWrite + Unpin,
{
    let Some((file, meta)) = open(path).await else {
        ResponseWriter::new(&Response::not_found())
            .write_to_stream(stream, limits.write_timeout())
            .await?;
        return Ok(TransferStatus::Missing);
    };

    ResponseWriter::new(&Response::file_head(meta.content_type, meta.size_bytes))
        .write_to_stream(stream, limits.write_timeout())
        .await?;

    // Never send more than content-length promised, even if the file grows
    let mut file = file.take(meta.size_bytes);
    let mut chunk = vec![0u8; limits.file_chunk_size.max(1)];
    let mut sent: u64 = 0;

    loop {
        let n = file
            .read(&mut chunk)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }

        write_fully(stream, &chunk[..n], limits.write_timeout()).await?;
        sent += n as u64;
    }

    timeout(limits.write_timeout(), stream.flush())
        .await
        .context("flush timed out")?
        .context("flush failed")?;

    if sent != meta.size_bytes {
        return Err(anyhow::anyhow!(
            "{} shrank during transfer: sent {} of {} bytes",
            path.display(),
            sent,
            meta.size_bytes
        ));
    }

    Ok(TransferStatus::Sent { bytes: sent })
}

async fn open(path: &Path) -> Option<(File, FileMetadata)> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Requested name is not a regular file");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot stat requested file");
            return None;
        }
    };

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot open requested file");
            return None;
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Some((
        file,
        FileMetadata {
            size_bytes: meta.len(),
            content_type: content_type_for(&name),
        },
    ))
}
