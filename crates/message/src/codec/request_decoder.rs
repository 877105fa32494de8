//! HTTP request decoder.
//!
//! [`RequestDecoder::parse`] turns one complete, fully buffered request into a
//! [`Request`]. The [`Decoder`] implementation sits in front of it for streamed
//! input: it waits until a whole message has been buffered, then hands exactly
//! that frame to the parser.
//!
//! # Example
//!
//! ```
//! use micro_message::codec::RequestDecoder;
//!
//! let request = RequestDecoder::parse(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert_eq!(request.method(), b"GET");
//! assert_eq!(request.header("host"), Some(&b"example.com"[..]));
//! ```

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::ensure;
use crate::map::HeaderMap;
use crate::protocol::{HttpBody, HttpVersion, ParseError, Request};
use crate::utils::{find, trim_spaces, try_copy, try_copy_lowercase};

/// Maximum number of bytes buffered while waiting for the end of the header block
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Maximum body size accepted when framing a streamed request
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const CRLF: &[u8] = b"\r\n";
const SEPARATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &[u8] = b"content-length";

/// Decoder for HTTP requests.
///
/// The limits only apply to the streaming [`Decoder`] side; [`RequestDecoder::parse`]
/// accepts any slice it is given.
#[derive(Debug, Clone, Copy)]
pub struct RequestDecoder {
    max_header_bytes: usize,
    max_body_bytes: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_header_bytes: usize, max_body_bytes: usize) -> Self {
        Self { max_header_bytes, max_body_bytes }
    }

    /// Parses a complete request held in `data`.
    ///
    /// All scanning stays within `data`; no terminator byte is expected after it.
    /// Every byte after the `CRLF CRLF` separator is taken as the body. When a
    /// `content-length` header is present it must match the body length exactly.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered; nothing built so far is returned.
    pub fn parse(data: &[u8]) -> Result<Request, ParseError> {
        let sep = find(data, SEPARATOR).ok_or(ParseError::MissingSeparator)?;
        let line_end = find(&data[..sep + CRLF.len()], CRLF).ok_or(ParseError::MissingRequestLineEnd)?;

        let (method, uri, version) = parse_request_line(&data[..line_end])?;

        let headers = if line_end == sep { None } else { Some(parse_headers(&data[line_end + CRLF.len()..sep])?) };

        let head_len = sep + SEPARATOR.len();
        trace!(header_size = head_len, "parsed request head");

        let body_bytes = &data[head_len..];
        if let Some(value) = headers.as_ref().and_then(|headers| headers.get(CONTENT_LENGTH)) {
            let declared = parse_content_length(value)?;
            if u64::try_from(body_bytes.len()).ok() != Some(declared) {
                warn!(declared, actual = body_bytes.len(), "content-length does not match body length");
                return Err(ParseError::ContentLengthMismatch { declared, actual: body_bytes.len() });
            }
        }
        let body = HttpBody::try_copy_from(body_bytes)?;

        Ok(Request::from_parts(try_copy(method)?, try_copy(uri)?, version, headers, body))
    }

    /// Returns the length of the first complete message in `src`, or `None` if more
    /// bytes are needed.
    fn frame_len(&self, src: &[u8]) -> Result<Option<usize>, ParseError> {
        let Some(sep) = find(src, SEPARATOR) else {
            ensure!(
                src.len() <= self.max_header_bytes,
                ParseError::too_large_request(src.len(), self.max_header_bytes)
            );
            return Ok(None);
        };

        let head_len = sep + SEPARATOR.len();
        ensure!(
            head_len <= self.max_header_bytes,
            ParseError::too_large_request(head_len, self.max_header_bytes)
        );

        let body_len = declared_content_length(&src[..sep]).unwrap_or(0);
        ensure!(body_len <= self.max_body_bytes, ParseError::too_large_request(body_len, self.max_body_bytes));

        let total = head_len + body_len;
        if src.len() < total { Ok(None) } else { Ok(Some(total)) }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_limits(MAX_HEADER_BYTES, MAX_BODY_BYTES)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.frame_len(src)? {
            Some(len) => {
                let frame = src.split_to(len);
                if !src.is_empty() {
                    trace!(leftover = src.len(), "bytes after the request frame are left unread");
                }
                Self::parse(&frame).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Parses whatever is left once the stream ends, so truncated input surfaces
    /// the parser's own error instead of a generic EOF.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let frame = src.split();
        Self::parse(&frame).map(Some)
    }
}

fn parse_request_line(line: &[u8]) -> Result<(&[u8], &[u8], HttpVersion), ParseError> {
    let sp1 = line
        .iter()
        .position(|b| *b == b' ')
        .ok_or_else(|| ParseError::malformed_request_line("missing space after method"))?;
    let sp2 = line[sp1 + 1..]
        .iter()
        .position(|b| *b == b' ')
        .map(|offset| sp1 + 1 + offset)
        .ok_or_else(|| ParseError::malformed_request_line("missing space before version"))?;

    ensure!(sp1 > 0, ParseError::malformed_request_line("empty method"));
    ensure!(sp2 > sp1 + 1, ParseError::malformed_request_line("empty uri"));

    let token = &line[sp2 + 1..];
    ensure!(!token.is_empty(), ParseError::malformed_request_line("empty version"));
    ensure!(!token.contains(&b' '), ParseError::malformed_request_line("unexpected data after version"));

    let version = HttpVersion::parse_token(token)?;
    Ok((&line[..sp1], &line[sp1 + 1..sp2], version))
}

fn parse_headers(block: &[u8]) -> Result<HeaderMap, ParseError> {
    let mut headers = HeaderMap::new();

    for line in Lines(block) {
        let colon = line
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| ParseError::malformed_header_line("missing ':'"))?;
        ensure!(colon > 0, ParseError::malformed_header_line("line starts with ':'"));

        let key = trim_spaces(&line[..colon]);
        ensure!(!key.is_empty(), ParseError::EmptyHeaderKey);

        let value = trim_spaces(&line[colon + 1..]);
        headers.set(try_copy_lowercase(key)?, value)?;
    }

    Ok(headers)
}

/// Parses a `content-length` value: one or more ASCII digits fitting in a `u64`.
fn parse_content_length(value: &[u8]) -> Result<u64, ParseError> {
    ensure!(!value.is_empty(), ParseError::invalid_content_length("value is empty"));

    value.iter().try_fold(0u64, |acc, b| {
        ensure!(
            b.is_ascii_digit(),
            ParseError::invalid_content_length(format!("{:?} is not a decimal integer", String::from_utf8_lossy(value)))
        );
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(u64::from(b - b'0')))
            .ok_or_else(|| ParseError::invalid_content_length("value overflows u64"))
    })
}

/// Looks for a usable `content-length` in a raw header block. As in the parsed header
/// map, the last occurrence wins. Unparseable values are ignored here; the parser
/// reports them once the frame reaches it.
fn declared_content_length(head: &[u8]) -> Option<usize> {
    let value = Lines(head)
        .skip(1)
        .filter_map(|line| {
            let colon = line.iter().position(|b| *b == b':')?;
            trim_spaces(&line[..colon])
                .eq_ignore_ascii_case(CONTENT_LENGTH)
                .then(|| trim_spaces(&line[colon + 1..]))
        })
        .last()?;

    let length = parse_content_length(value).ok()?;
    usize::try_from(length).ok()
}

/// Splits a byte block on `CRLF`.
struct Lines<'a>(&'a [u8]);

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }
        match find(self.0, CRLF) {
            Some(end) => {
                let line = &self.0[..end];
                self.0 = &self.0[end + CRLF.len()..];
                Some(line)
            }
            None => Some(std::mem::take(&mut self.0)),
        }
    }
}
