//! Ordered associative storage for header fields.
//!
//! [`HeaderMap`] maps byte-string keys to byte-string values. Lookups go through a
//! chained hash table whose bucket count is always prime, while a second linked list
//! records insertion order so that iteration yields the most recently inserted key
//! first. Both lists are expressed as indices into a single entry arena.
//!
//! The map compares keys byte for byte; any case folding is the caller's business
//! (the request parser and response builder lower-case keys before inserting).

mod header_map;
mod prime;

pub use header_map::DEFAULT_CAPACITY;
pub use header_map::HeaderMap;
pub use header_map::HeaderPair;
pub use header_map::Iter;
pub use header_map::Keys;
pub use prime::is_prime;
pub use prime::next_prime;

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("out of memory while storing header entry")]
    OutOfMemory,
}

impl From<TryReserveError> for MapError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
