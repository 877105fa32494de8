//! HTTP protocol version handling.
//!
//! [`HttpVersion`] is a plain `(major, minor)` pair. Only 0.9, 1.0, 1.1, 2 and 3
//! are considered valid; construction never checks this, [`HttpVersion::is_valid`]
//! does.

use std::fmt;

use crate::ensure;
use crate::protocol::ParseError;

const VERSION_PREFIX: &[u8] = b"HTTP/";

/// Highest major version accepted when a request omits the minor component.
const MAX_BARE_MAJOR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpVersion {
    major: u8,
    minor: u8,
}

impl HttpVersion {
    pub const HTTP_09: HttpVersion = HttpVersion::new(0, 9);
    pub const HTTP_10: HttpVersion = HttpVersion::new(1, 0);
    pub const HTTP_11: HttpVersion = HttpVersion::new(1, 1);
    pub const HTTP_2: HttpVersion = HttpVersion::new(2, 0);
    pub const HTTP_3: HttpVersion = HttpVersion::new(3, 0);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    #[inline]
    pub const fn major(&self) -> u8 {
        self.major
    }

    #[inline]
    pub const fn minor(&self) -> u8 {
        self.minor
    }

    /// Returns true for the combinations 0.9, 1.0, 1.1, 2.0 and 3.0.
    pub const fn is_valid(&self) -> bool {
        matches!((self.major, self.minor), (0, 9) | (1, 0) | (1, 1) | (2, 0) | (3, 0))
    }

    /// Parses the version token of a request line: `HTTP/<major>[.<minor>]`.
    ///
    /// Without a minor component the minor defaults to 0 and the major must not
    /// exceed 3. With both components the pair must be a valid combination.
    pub(crate) fn parse_token(token: &[u8]) -> Result<Self, ParseError> {
        let digits = token.strip_prefix(VERSION_PREFIX).ok_or_else(|| ParseError::invalid_version(token))?;

        let version = match digits.iter().position(|b| *b == b'.') {
            Some(dot) => {
                let major = parse_number(&digits[..dot]).ok_or_else(|| ParseError::invalid_version(token))?;
                let minor = parse_number(&digits[dot + 1..]).ok_or_else(|| ParseError::invalid_version(token))?;
                let version = HttpVersion::new(major, minor);
                ensure!(version.is_valid(), ParseError::invalid_version(token));
                version
            }
            None => {
                let major = parse_number(digits).ok_or_else(|| ParseError::invalid_version(token))?;
                ensure!(major <= MAX_BARE_MAJOR, ParseError::invalid_version(token));
                HttpVersion::new(major, 0)
            }
        };

        Ok(version)
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        Self::HTTP_11
    }
}

/// Formats the version as it appears on a status line: `HTTP/1.1`, or `HTTP/2`
/// for major versions that have no minor component.
impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.major >= 2 {
            write!(f, "HTTP/{}", self.major)
        } else {
            write!(f, "HTTP/{}.{}", self.major, self.minor)
        }
    }
}

impl From<http::Version> for HttpVersion {
    fn from(version: http::Version) -> Self {
        match version {
            http::Version::HTTP_09 => Self::HTTP_09,
            http::Version::HTTP_10 => Self::HTTP_10,
            http::Version::HTTP_2 => Self::HTTP_2,
            http::Version::HTTP_3 => Self::HTTP_3,
            _ => Self::HTTP_11,
        }
    }
}

impl TryFrom<HttpVersion> for http::Version {
    type Error = HttpVersion;

    fn try_from(version: HttpVersion) -> Result<Self, Self::Error> {
        match (version.major, version.minor) {
            (0, 9) => Ok(http::Version::HTTP_09),
            (1, 0) => Ok(http::Version::HTTP_10),
            (1, 1) => Ok(http::Version::HTTP_11),
            (2, 0) => Ok(http::Version::HTTP_2),
            (3, 0) => Ok(http::Version::HTTP_3),
            _ => Err(version),
        }
    }
}

/// Parses a non-empty run of ASCII digits that fits in a `u8`.
fn parse_number(digits: &[u8]) -> Option<u8> {
    if digits.is_empty() {
        return None;
    }

    digits.iter().try_fold(0u8, |acc, b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(b - b'0')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_table() {
        assert!(HttpVersion::HTTP_09.is_valid());
        assert!(HttpVersion::HTTP_10.is_valid());
        assert!(HttpVersion::HTTP_11.is_valid());
        assert!(HttpVersion::HTTP_2.is_valid());
        assert!(HttpVersion::HTTP_3.is_valid());

        assert!(!HttpVersion::new(1, 2).is_valid());
        assert!(!HttpVersion::new(0, 0).is_valid());
        assert!(!HttpVersion::new(2, 1).is_valid());
        assert!(!HttpVersion::new(4, 0).is_valid());
    }

    #[test]
    fn parse_full_tokens() {
        assert_eq!(HttpVersion::parse_token(b"HTTP/1.1").unwrap(), HttpVersion::HTTP_11);
        assert_eq!(HttpVersion::parse_token(b"HTTP/1.0").unwrap(), HttpVersion::HTTP_10);
        assert_eq!(HttpVersion::parse_token(b"HTTP/0.9").unwrap(), HttpVersion::HTTP_09);
        assert_eq!(HttpVersion::parse_token(b"HTTP/2.0").unwrap(), HttpVersion::HTTP_2);
    }

    #[test]
    fn parse_major_only_defaults_minor() {
        assert_eq!(HttpVersion::parse_token(b"HTTP/2").unwrap(), HttpVersion::HTTP_2);
        assert_eq!(HttpVersion::parse_token(b"HTTP/3").unwrap(), HttpVersion::HTTP_3);
        assert_eq!(HttpVersion::parse_token(b"HTTP/1").unwrap(), HttpVersion::HTTP_10);
        assert!(matches!(HttpVersion::parse_token(b"HTTP/4"), Err(ParseError::InvalidVersion { .. })));
    }

    #[test]
    fn parse_rejects_garbage() {
        for token in [
            &b"HTTP/1.2"[..],
            b"HTTP/",
            b"HTTP/1.",
            b"HTTP/.1",
            b"HTTP/1.1x",
            b"HTTP/1.1.1",
            b"http/1.1",
            b"HTTP1.1",
            b"JUNKHTTP/1.1",
            b"HTTP/256.0",
            b"HTTP/+1.1",
        ] {
            assert!(
                matches!(HttpVersion::parse_token(token), Err(ParseError::InvalidVersion { .. })),
                "{}",
                String::from_utf8_lossy(token)
            );
        }
    }

    #[test]
    fn display_matches_status_line() {
        assert_eq!(HttpVersion::HTTP_11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::HTTP_10.to_string(), "HTTP/1.0");
        assert_eq!(HttpVersion::HTTP_2.to_string(), "HTTP/2");
        assert_eq!(HttpVersion::new(3, 7).to_string(), "HTTP/3");
    }

    #[test]
    fn converts_with_http_crate() {
        assert_eq!(http::Version::try_from(HttpVersion::HTTP_11), Ok(http::Version::HTTP_11));
        assert_eq!(http::Version::try_from(HttpVersion::new(1, 5)), Err(HttpVersion::new(1, 5)));
        assert_eq!(HttpVersion::from(http::Version::HTTP_2), HttpVersion::HTTP_2);
        assert_eq!(HttpVersion::default(), HttpVersion::HTTP_11);
    }
}
