//! A micro HTTP/1.x message library
//!
//! This crate parses raw request bytes into structured requests, builds responses
//! and serializes them back to bytes, and stores header fields in a purpose-built
//! ordered hash map. A thin tokio connection layer is included for serving one
//! request per connection.
//!
//! # Features
//!
//! - Request parsing from a single, fully buffered byte slice
//! - Response building with CR/LF injection checks on every header
//! - Header map with prime bucket counts and most-recent-first iteration
//! - Explicit `content-length` contract in both directions
//! - Allocation failures reported as errors instead of aborting
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use micro_message::connection::HttpConnection;
//! use micro_message::handler::make_handler;
//! use micro_message::protocol::{Request, Response};
//! use std::error::Error;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = Arc::clone(&handler);
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Result<Response, Box<dyn Error + Send + Sync>> {
//!     info!(uri = %String::from_utf8_lossy(request.uri()), "receive request");
//!
//!     let body = "Hello World!\r\n";
//!     let mut response = Response::with_status(StatusCode::OK);
//!     response.set_header("Content-Type", "text/plain")?;
//!     response.set_header("Content-Length", body.len().to_string())?;
//!     response.set_body(body)?;
//!     Ok(response)
//! }
//! ```
//!
//! # Architecture
//!
//! - [`map`]: the ordered header map
//! - [`protocol`]: request, response, version, body and error types
//! - [`codec`]: request parsing and response serialization
//! - [`handler`]: request handler traits and utilities
//! - [`connection`]: one-request-per-connection serving over tokio streams
//!
//! # Wire Format
//!
//! Requests are read as `METHOD SP URI SP HTTP/<major>[.<minor>] CRLF`, header lines,
//! an empty line and the body. Header keys are lower-cased and values trimmed of
//! surrounding spaces. When `content-length` is present it must match the body exactly.
//!
//! Responses are written with a status line, headers most recently set first, an
//! empty line and the body. A non-empty body requires a `content-length` header set
//! by the caller.
//!
//! # Limitations
//!
//! - No chunked transfer encoding
//! - No keep-alive: a connection serves exactly one request
//! - The parser needs the whole message in memory

pub mod codec;
pub mod connection;
pub mod handler;
pub mod map;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
