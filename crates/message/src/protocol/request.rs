//! Parsed HTTP request.
//!
//! A [`Request`] only comes out of [`RequestDecoder::parse`](crate::codec::RequestDecoder::parse)
//! (or the [`Request::parse`] shortcut); there is no way to build a half-initialised one.

use bytes::Bytes;
use http::Method;

use crate::codec::RequestDecoder;
use crate::map::{HeaderMap, MapError};
use crate::protocol::{HttpBody, HttpVersion, ParseError};
use crate::utils::{trim_spaces, try_copy_lowercase};

/// An HTTP request: method, target, version, optional headers and body.
///
/// `headers()` is `None` when the request carried no header lines at all, which is
/// distinct from an empty map.
#[derive(Debug, Clone)]
pub struct Request {
    method: Bytes,
    uri: Bytes,
    version: HttpVersion,
    headers: Option<HeaderMap>,
    body: HttpBody,
}

impl Request {
    pub(crate) fn from_parts(
        method: Bytes,
        uri: Bytes,
        version: HttpVersion,
        headers: Option<HeaderMap>,
        body: HttpBody,
    ) -> Self {
        Self { method, uri, version, headers, body }
    }

    /// Parses a complete request held in `data`. See [`RequestDecoder::parse`].
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        RequestDecoder::parse(data)
    }

    pub fn method(&self) -> &[u8] {
        &self.method
    }

    /// Returns the method as an [`http::Method`], or `None` if it isn't a valid token.
    pub fn method_kind(&self) -> Option<Method> {
        Method::from_bytes(&self.method).ok()
    }

    pub fn uri(&self) -> &[u8] {
        &self.uri
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// Looks up a header by its lower-cased key.
    pub fn header<K: AsRef<[u8]>>(&self, key: K) -> Option<&[u8]> {
        self.headers.as_ref()?.get(key)
    }

    /// Header keys, most recently inserted first.
    pub fn header_keys(&self) -> impl Iterator<Item = &[u8]> {
        self.headers.iter().flat_map(HeaderMap::keys)
    }

    pub fn contains_header<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.headers.as_ref().is_some_and(|headers| headers.contains_key(key))
    }

    /// Sets a header the same way the parser does: key lower-cased, value trimmed of
    /// surrounding spaces. The header map is created on first use.
    pub fn set_header<K, V>(&mut self, key: K, value: V) -> Result<(), MapError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let key = try_copy_lowercase(key.as_ref())?;
        let value = trim_spaces(value.as_ref());

        match &mut self.headers {
            Some(headers) => headers.set(key, value),
            None => {
                let mut headers = HeaderMap::new();
                headers.set(key, value)?;
                self.headers = Some(headers);
                Ok(())
            }
        }
    }

    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Consumes the request and returns its body.
    pub fn into_body(self) -> HttpBody {
        self.body
    }
}
