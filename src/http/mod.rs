//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server side: one request per connection,
//! no chunked encoding, no TLS.
//!
//! # Architecture
//!
//! - **`connection`**: owns one accepted stream and drives it from first byte to close
//! - **`parser`**: turns a buffered request head into a [`request::ParsedRequest`]
//! - **`request`**: parsed request and the case-insensitive header map
//! - **`response`**: status codes and the buffered response a pipeline builds
//! - **`writer`**: serializes the status line and header block
//! - **`mime`**: extension to content-type table for static files
//! - **`static_files`**: file reads and directory listings under the document root
//!
//! # Request routing
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Scan for the blank line, bounded by size and idle time
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Routing        │
//!        └──────┬───────────┘
//!               ├─ known extension → file bytes
//!               ├─ trailing '/'    → directory listing
//!               └─ otherwise       → pipeline (via PipelineAdapter)
//!               ▼
//!        ┌──────────────────┐
//!        │    Closed        │ ← Exactly once, on every path
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use portico::config::{Limits, Site};
//! use portico::http::connection::Connection;
//! use portico::pipeline::EchoPipeline;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let site = Site::new("/", ".")?;
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let local = socket.local_addr()?;
//!         let site = site.clone();
//!         tokio::spawn(async move {
//!             let conn = Connection::new(socket, peer, local, Limits::default());
//!             if let Err(e) = conn.run(&site, &EchoPipeline).await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod static_files;
pub mod writer;
