//! Tests for streaming files to a writer

use tempfile::tempdir;
use tokio::io::BufWriter;
use webserver::config::LimitsConfig;
use webserver::http::response::NOT_FOUND_BODY;
use webserver::http::transfer::{TransferStatus, send_file};

#[tokio::test]
async fn test_send_file_flushes_buffered_writer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("file9.html");
    std::fs::write(&path, b"<p>nine</p>").unwrap();

    let mut writer = BufWriter::new(Vec::new());
    let status = send_file(&mut writer, &path, &LimitsConfig::default())
        .await
        .unwrap();

    assert_eq!(status, TransferStatus::Sent { bytes: 11 });
    assert!(writer.buffer().is_empty());

    let written = writer.into_inner();
    assert!(written.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(written.ends_with(b"\r\n\r\n<p>nine</p>"));
}

#[tokio::test]
async fn test_send_file_missing_writes_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image4.jpg");

    let mut writer = BufWriter::new(Vec::new());
    let status = send_file(&mut writer, &path, &LimitsConfig::default())
        .await
        .unwrap();

    assert_eq!(status, TransferStatus::Missing);
    assert!(writer.buffer().is_empty());

    let written = String::from_utf8(writer.into_inner()).unwrap();
    assert!(written.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(written.contains(NOT_FOUND_BODY));
}
