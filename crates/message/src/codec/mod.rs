//! HTTP codec module for decoding requests and encoding responses
//!
//! Both directions work on whole messages held in memory:
//!
//! - [`RequestDecoder`]: parses a complete request; as a `tokio_util` [`Decoder`](tokio_util::codec::Decoder)
//!   it frames a byte stream into complete requests first
//! - [`ResponseEncoder`]: writes a response in wire format; as an
//!   [`Encoder`](tokio_util::codec::Encoder) it appends to an outgoing buffer
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_message::codec::{RequestDecoder, ResponseEncoder};
//! use micro_message::protocol::Response;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..]);
//! let request = RequestDecoder::new().decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.uri(), b"/");
//!
//! let mut response = Response::with_status(http::StatusCode::NO_CONTENT);
//! response.set_header("Connection", "close").unwrap();
//!
//! let mut out = BytesMut::new();
//! ResponseEncoder::new().encode(response, &mut out).unwrap();
//! assert_eq!(&out[..], b"HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n");
//! ```

mod request_decoder;
mod response_encoder;

pub use request_decoder::{MAX_BODY_BYTES, MAX_HEADER_BYTES, RequestDecoder};
pub use response_encoder::ResponseEncoder;
