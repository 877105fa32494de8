//! Utility macros and functions shared by the parser, serializer and header map.

use bytes::Bytes;
use std::collections::TryReserveError;

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(sp2 > sp1 + 1, ParseError::malformed_request_line("empty uri"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Copies `src` into a freshly allocated buffer, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_copy(src: &[u8]) -> Result<Bytes, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len())?;
    buf.extend_from_slice(src);
    Ok(Bytes::from(buf))
}

/// Like [`try_copy`] but folds ASCII letters to lowercase.
pub(crate) fn try_copy_lowercase(src: &[u8]) -> Result<Bytes, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len())?;
    buf.extend(src.iter().map(u8::to_ascii_lowercase));
    Ok(Bytes::from(buf))
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Strips leading and trailing space (0x20) bytes. Tabs and other whitespace are kept.
pub(crate) fn trim_spaces(mut bytes: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' '] = bytes {
        bytes = rest;
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_needle() {
        assert_eq!(find(b"GET / HTTP/1.1\r\n\r\n", b"\r\n\r\n"), Some(14));
        assert_eq!(find(b"GET / HTTP/1.1\r\n", b"\r\n\r\n"), None);
        assert_eq!(find(b"\r\n", b"\r\n\r\n"), None);
        assert_eq!(find(b"a\0b\r\n", b"\r\n"), Some(3));
    }

    #[test]
    fn trim_only_spaces() {
        assert_eq!(trim_spaces(b"   with leading space"), b"with leading space");
        assert_eq!(trim_spaces(b"value  "), b"value");
        assert_eq!(trim_spaces(b"    "), b"");
        assert_eq!(trim_spaces(b"\tvalue\t"), b"\tvalue\t");
        assert_eq!(trim_spaces(b""), b"");
    }

    #[test]
    fn lowercase_copy() {
        assert_eq!(&try_copy_lowercase(b"X-CUSTOM-Header").unwrap()[..], b"x-custom-header");
        assert_eq!(&try_copy(b"Keep").unwrap()[..], b"Keep");
    }
}
