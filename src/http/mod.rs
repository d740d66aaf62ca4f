//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: one `GET` per connection, for a
//! fixed namespace of files, answered with a 200, 404 or 400.
//!
//! # Architecture
//!
//! - **`reader`**: accumulates socket bytes until the header block is complete
//! - **`parser`**: classifies the header text into an [`parser::Outcome`]
//! - **`request`**: the parsed request line
//! - **`response`**: status codes, fixed error responses, response builder
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: content type detection based on file extensions
//! - **`transfer`**: streams a served file in bounded chunks
//! - **`connection`**: the per-connection state machine tying it together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the full header block
//!        └──────┬──────┘
//!               │ Header read (or peer closed, or size limit hit)
//!               ▼
//!        ┌──────────────────┐
//!        │   Classified     │ ← Success / NotFound / BadRequest
//!        └──────┬───────────┘
//!               │ Response (or file) written
//!               ▼
//!        ┌──────────────────┐
//!        │    Responded     │ ← Caller closes the connection
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use webserver::config::Config;
//! use webserver::http::connection::{Connection, ConnectionContext};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = Arc::new(ConnectionContext::from_config(&Config::default())?);
//!     let listener = TcpListener::bind("127.0.0.1:1701").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let ctx = ctx.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, ctx);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod reader;
pub mod connection;
pub mod writer;
pub mod mime;
pub mod transfer;
