//! HTTP message types.
//!
//! This module holds the values that travel through the parser and serializer:
//!
//! - **Requests** ([`Request`]): produced by parsing raw bytes, read-mostly afterwards
//! - **Responses** ([`Response`]): assembled field by field, then serialized
//! - **Versions** ([`HttpVersion`]): `major.minor` pairs with validity checks
//! - **Bodies** ([`HttpBody`]): owned byte payloads
//!
//! # Error Handling
//!
//! - [`ParseError`]: everything that can go wrong turning bytes into a [`Request`]
//! - [`ResponseError`]: invalid response state or unsafe input to a setter
//! - [`HttpError`]: wraps both for callers that deal with whole exchanges
//!
//! Header keys are always stored lower-cased and values trimmed of surrounding
//! spaces, so lookups are expected to use lower-case keys.

mod body;
pub use body::HttpBody;

mod version;
pub use version::HttpVersion;

mod request;
pub use request::Request;

mod response;
pub use response::Response;

mod error;
pub use error::HeaderPart;
pub use error::HttpError;
pub use error::ParseError;
pub use error::ResponseError;
