use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

use crate::map::MapError;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ResponseError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request: missing header-body separator")]
    MissingSeparator,

    #[error("malformed request: cannot find end of request line")]
    MissingRequestLineEnd,

    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    #[error("invalid http version: {token:?}")]
    InvalidVersion { token: String },

    #[error("malformed header line: {reason}")]
    MalformedHeaderLine { reason: String },

    #[error("malformed header line: key is empty or only whitespace")]
    EmptyHeaderKey,

    #[error("content-length header ({declared}) does not match actual body length ({actual})")]
    ContentLengthMismatch { declared: u64, actual: usize },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("request size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeRequest { current_size: usize, max_size: usize },

    #[error("out of memory while building request")]
    OutOfMemory,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(str: S) -> Self {
        Self::MalformedRequestLine { reason: str.to_string() }
    }

    pub fn invalid_version(token: &[u8]) -> Self {
        Self::InvalidVersion { token: String::from_utf8_lossy(token).into_owned() }
    }

    pub fn malformed_header_line<S: ToString>(str: S) -> Self {
        Self::MalformedHeaderLine { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn too_large_request(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeRequest { current_size, max_size }
    }
}

impl From<MapError> for ParseError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::OutOfMemory => Self::OutOfMemory,
        }
    }
}

impl From<TryReserveError> for ParseError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("body data is missing while length is {length}")]
    NullInput { length: usize },

    #[error("body length {length} exceeds the {available} bytes supplied")]
    BodyLengthOutOfRange { length: usize, available: usize },

    #[error("CR or LF rejected in header {part}")]
    UnsafeHeaderValue { part: HeaderPart },

    #[error("CR or LF rejected in reason phrase")]
    UnsafeReasonPhrase,

    #[error("invalid response: 'content-length' must be set if response has body")]
    MissingContentLength,

    #[error("invalid response: status code was never set")]
    MissingStatusCode,

    #[error("out of memory while building response")]
    OutOfMemory,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ResponseError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

impl From<MapError> for ResponseError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::OutOfMemory => Self::OutOfMemory,
        }
    }
}

impl From<TryReserveError> for ResponseError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Which half of a header field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPart {
    Key,
    Value,
}

impl std::fmt::Display for HeaderPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderPart::Key => f.write_str("key"),
            HeaderPart::Value => f.write_str("value"),
        }
    }
}
