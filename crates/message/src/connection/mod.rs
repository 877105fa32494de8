//! HTTP connection handling module
//!
//! Glues the codec to an async byte stream. Each [`HttpConnection`] owns its read
//! and write buffers and serves a single request:
//!
//! - frames the incoming bytes into one complete request (bounded by [`ConnectionConfig`])
//! - passes it to a [`Handler`](crate::handler::Handler)
//! - writes the response back and shuts the write side down
//!
//! Requests that fail to parse get `400 Bad Request`; handler failures get
//! `500 Internal Server Error`.

mod config;
mod http_connection;

pub use config::{ConnectionConfig, READ_BUFFER_CAPACITY};
pub use http_connection::HttpConnection;
