//! HTTP response under construction.
//!
//! A [`Response`] starts out with no status, no reason phrase, version 1.1, no
//! headers and an empty body. Every setter either applies its change fully or
//! returns an error and leaves the response untouched.

use bytes::{Bytes, BytesMut};
use http::StatusCode;
use tracing::error;

use crate::codec::ResponseEncoder;
use crate::map::HeaderMap;
use crate::protocol::{HeaderPart, HttpBody, HttpVersion, ResponseError};
use crate::utils::{trim_spaces, try_copy, try_copy_lowercase};

#[derive(Debug, Clone, Default)]
pub struct Response {
    status_code: Option<u16>,
    reason_phrase: Option<Bytes>,
    version: HttpVersion,
    headers: Option<HeaderMap>,
    body: HttpBody,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a response carrying `status` and its canonical reason phrase.
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status_code: Some(status.as_u16()),
            reason_phrase: status.canonical_reason().map(|reason| Bytes::from_static(reason.as_bytes())),
            ..Self::default()
        }
    }

    /// Returns the status code, `None` until one is set.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn set_status_code(&mut self, code: u16) {
        self.status_code = Some(code);
    }

    pub fn reason_phrase(&self) -> Option<&[u8]> {
        self.reason_phrase.as_deref()
    }

    /// Replaces the reason phrase with a copy of `text`.
    pub fn set_reason_phrase<T: AsRef<[u8]>>(&mut self, text: T) -> Result<(), ResponseError> {
        let text = text.as_ref();
        if contains_line_break(text) {
            error!("CRLF sequence rejected in reason phrase");
            return Err(ResponseError::UnsafeReasonPhrase);
        }

        self.reason_phrase = Some(try_copy(text)?);
        Ok(())
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    /// Stores the version as given; use [`HttpVersion::is_valid`] to check it.
    pub fn set_version(&mut self, major: u8, minor: u8) {
        self.version = HttpVersion::new(major, minor);
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// Sets a header, replacing any previous value for the same key.
    ///
    /// The key is lower-cased and the value trimmed of surrounding spaces. Keys or
    /// values containing CR or LF are rejected so that callers can't smuggle extra
    /// header lines into the serialized response.
    pub fn set_header<K, V>(&mut self, key: K, value: V) -> Result<(), ResponseError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let (key, value) = (key.as_ref(), value.as_ref());

        if contains_line_break(key) {
            error!("CRLF sequence rejected in header key");
            return Err(ResponseError::UnsafeHeaderValue { part: HeaderPart::Key });
        }
        if contains_line_break(value) {
            error!("CRLF sequence rejected in header value");
            return Err(ResponseError::UnsafeHeaderValue { part: HeaderPart::Value });
        }

        let key = try_copy_lowercase(key)?;
        let value = trim_spaces(value);

        match &mut self.headers {
            Some(headers) => headers.set(key, value)?,
            None => {
                let mut headers = HeaderMap::new();
                headers.set(key, value)?;
                self.headers = Some(headers);
            }
        }
        Ok(())
    }

    /// Looks up a header by its lower-cased key.
    pub fn header<K: AsRef<[u8]>>(&self, key: K) -> Option<&[u8]> {
        self.headers.as_ref()?.get(key)
    }

    /// Header keys in serialization order, most recently inserted first.
    pub fn header_keys(&self) -> impl Iterator<Item = &[u8]> {
        self.headers.iter().flat_map(HeaderMap::keys)
    }

    pub fn contains_header<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.headers.as_ref().is_some_and(|headers| headers.contains_key(key))
    }

    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Replaces the body with a copy of `data`.
    ///
    /// No `content-length` header is derived from it; callers set one explicitly.
    pub fn set_body<B: AsRef<[u8]>>(&mut self, data: B) -> Result<(), ResponseError> {
        self.body = HttpBody::try_copy_from(data.as_ref())?;
        Ok(())
    }

    /// Replaces the body with the first `length` bytes of `data`.
    ///
    /// `None` with a zero length clears the body; `None` with any other length is
    /// rejected with [`ResponseError::NullInput`].
    pub fn set_body_with_length(&mut self, data: Option<&[u8]>, length: usize) -> Result<(), ResponseError> {
        let Some(data) = data else {
            if length != 0 {
                return Err(ResponseError::NullInput { length });
            }
            self.body = HttpBody::new();
            return Ok(());
        };

        let src = data
            .get(..length)
            .ok_or(ResponseError::BodyLengthOutOfRange { length, available: data.len() })?;
        self.body = HttpBody::try_copy_from(src)?;
        Ok(())
    }

    /// Serializes the response into wire format.
    ///
    /// See [`ResponseEncoder::write_response`] for the exact layout and failure modes.
    pub fn serialize(&self) -> Result<Bytes, ResponseError> {
        ResponseEncoder::serialize(self)
    }

    /// Appends the serialized response to `dst`, leaving it untouched on error.
    pub fn encode_into(&self, dst: &mut BytesMut) -> Result<(), ResponseError> {
        ResponseEncoder::write_response(self, dst)
    }
}

fn contains_line_break(bytes: &[u8]) -> bool {
    bytes.iter().any(|b| matches!(b, b'\r' | b'\n'))
}
