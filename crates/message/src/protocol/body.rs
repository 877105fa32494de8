use bytes::Bytes;
use std::collections::TryReserveError;

/// An owned message body.
///
/// The body always holds its own copy of the bytes it was built from; an empty
/// body holds no buffer at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpBody {
    data: Option<Bytes>,
}

impl HttpBody {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `src` into a new body. An empty `src` produces an empty body.
    pub fn try_copy_from(src: &[u8]) -> Result<Self, TryReserveError> {
        if src.is_empty() {
            return Ok(Self::new());
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(src.len())?;
        buf.extend_from_slice(src);
        Ok(Self { data: Some(Bytes::from(buf)) })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Bytes::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the body bytes, empty when no buffer is held.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Returns the underlying buffer, `None` when the body is empty.
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_holds_no_buffer() {
        let body = HttpBody::try_copy_from(b"").unwrap();
        assert!(body.is_empty());
        assert!(body.data().is_none());
        assert_eq!(body.as_bytes(), b"");
        assert_eq!(body, HttpBody::new());
    }

    #[test]
    fn copies_source_bytes() {
        let mut src = b"name=FirstName+LastName".to_vec();
        let body = HttpBody::try_copy_from(&src).unwrap();
        src[0] = b'X';

        assert_eq!(body.len(), 23);
        assert_eq!(body.as_bytes(), b"name=FirstName+LastName");
    }
}
