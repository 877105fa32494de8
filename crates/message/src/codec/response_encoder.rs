//! HTTP response encoder.
//!
//! Writes a [`Response`] in wire format: status line, one line per header in
//! [`HeaderMap::keys`](crate::map::HeaderMap::keys) order, a blank line, then the
//! body bytes verbatim. Encoding either appends a complete message or appends
//! nothing at all.

use bytes::{BufMut, Bytes, BytesMut};
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{Response, ResponseError};

/// Initial buffer size reserved for the status line and headers
const INIT_HEADER_SIZE: usize = 256;

const CONTENT_LENGTH: &[u8] = b"content-length";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Serializes `response` into a freshly allocated buffer.
    pub fn serialize(response: &Response) -> Result<Bytes, ResponseError> {
        let mut dst = BytesMut::new();
        Self::write_response(response, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Appends the wire form of `response` to `dst`.
    ///
    /// No `content-length` is computed: a non-empty body without one fails with
    /// [`ResponseError::MissingContentLength`]. On any error `dst` is left exactly as
    /// it was.
    pub fn write_response(response: &Response, dst: &mut BytesMut) -> Result<(), ResponseError> {
        let status_code = response.status_code().ok_or(ResponseError::MissingStatusCode)?;

        if !response.body().is_empty() && !response.contains_header(CONTENT_LENGTH) {
            error!(body_size = response.body().len(), "response has body but no content-length header");
            return Err(ResponseError::MissingContentLength);
        }

        let start = dst.len();
        let result = write_message(response, status_code, dst);
        if result.is_err() {
            dst.truncate(start);
        }
        result
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = ResponseError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Self::write_response(&item, dst)
    }
}

fn write_message(response: &Response, status_code: u16, dst: &mut BytesMut) -> Result<(), ResponseError> {
    let body = response.body().as_bytes();
    dst.reserve(INIT_HEADER_SIZE + body.len());

    write!(FastWrite(dst), "{} {} ", response.version(), status_code)?;
    dst.put_slice(response.reason_phrase().unwrap_or_default());
    dst.put_slice(b"\r\n");

    if let Some(headers) = response.headers() {
        for (key, value) in headers {
            dst.put_slice(key);
            dst.put_slice(b": ");
            dst.put_slice(value);
            dst.put_slice(b"\r\n");
        }
    }
    dst.put_slice(b"\r\n");

    dst.put_slice(body);
    Ok(())
}

/// Adapter so `write!` can format straight into a `BytesMut`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use indoc::indoc;

    const HTML_BODY: &str = indoc! {r#"
        <!DOCTYPE html>
        <html>
        <head><title>Hello World!</title></head>
        <body>
        <h1>Hello, World!</h1>
        <p>This page is served by a tiny HTTP message library.</p>
        </body>
        </html>
    "#};

    fn ok_response() -> Response {
        let mut response = Response::new();
        response.set_status_code(200);
        response.set_reason_phrase("OK").unwrap();
        response
    }

    #[test]
    fn headers_serialize_most_recent_first() {
        assert_eq!(HTML_BODY.len(), 169);

        let mut response = ok_response();
        response.set_version(1, 1);
        response.set_header("Connection", "close").unwrap();
        response.set_header("Content-Length", HTML_BODY.len().to_string()).unwrap();
        response.set_header("Content-Type", "text/html; charset=UTF-8").unwrap();
        response.set_header("Date", "Mon, 27 Jul 2009 12:28:53 GMT").unwrap();
        response.set_body(HTML_BODY).unwrap();

        let bytes = response.serialize().unwrap();

        let expected = format!(
            "HTTP/1.1 200 OK\r\ndate: Mon, 27 Jul 2009 12:28:53 GMT\r\ncontent-type: text/html; charset=UTF-8\r\ncontent-length: 169\r\nconnection: close\r\n\r\n{HTML_BODY}"
        );
        assert_eq!(&bytes[..], expected.as_bytes());
    }

    #[test]
    fn no_headers_no_body() {
        let bytes = ok_response().serialize().unwrap();
        assert_eq!(&bytes[..], b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn body_without_content_length_fails() {
        let mut response = ok_response();
        response.set_header("Content-Type", "text/plain").unwrap();
        response.set_header("Connection", "close").unwrap();
        response.set_body("hello").unwrap();

        let mut dst = BytesMut::from(&b"previous"[..]);
        let result = ResponseEncoder::write_response(&response, &mut dst);

        assert!(matches!(result, Err(ResponseError::MissingContentLength)));
        assert_eq!(&dst[..], b"previous");
    }

    #[test]
    fn missing_status_code_fails() {
        let mut dst = BytesMut::new();
        let result = ResponseEncoder::new().encode(Response::new(), &mut dst);

        assert!(matches!(result, Err(ResponseError::MissingStatusCode)));
        assert!(dst.is_empty());
    }

    #[test]
    fn status_line_for_http2_has_no_minor() {
        let mut response = ok_response();
        response.set_version(2, 0);
        assert_eq!(&response.serialize().unwrap()[..], b"HTTP/2 200 OK\r\n\r\n");

        response.set_version(1, 0);
        assert_eq!(&response.serialize().unwrap()[..], b"HTTP/1.0 200 OK\r\n\r\n");
    }

    #[test]
    fn missing_reason_phrase_is_empty() {
        let mut response = Response::new();
        response.set_status_code(204);
        assert_eq!(&response.serialize().unwrap()[..], b"HTTP/1.1 204 \r\n\r\n");
    }

    #[test]
    fn encoder_appends_to_buffer() {
        let mut response = Response::with_status(StatusCode::NOT_FOUND);
        response.set_header("Content-Length", "9").unwrap();
        response.set_body("not found").unwrap();

        let mut dst = BytesMut::from(&b"HTTP/1.1 100 Continue\r\n\r\n"[..]);
        ResponseEncoder::new().encode(response, &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 404 Not Found\r\ncontent-length: 9\r\n\r\nnot found"
        );
    }

    #[test]
    fn binary_body_is_written_verbatim() {
        let mut response = ok_response();
        response.set_header("content-length", "4").unwrap();
        response.set_body([0u8, 159, 146, 150]).unwrap();

        let bytes = response.serialize().unwrap();
        assert!(bytes.ends_with(&[b'\r', b'\n', 0, 159, 146, 150]));
    }
}
