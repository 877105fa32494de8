//! Chained hash map with insertion-order tracking.
//!
//! Every entry lives in one arena (`Vec<Entry>`) and is threaded onto two doubly
//! linked lists by index:
//!
//! - a bucket chain, used for lookups (`bucket_prev` / `bucket_next`)
//! - the global order list, most recent entry at the head (`order_prev` / `order_next`)
//!
//! Removal uses `swap_remove` on the arena and then re-points the neighbours of the
//! entry that was moved into the vacated slot, so indices stay dense.
//!
//! Growth is checked before a new key is linked: when `size * 100 > capacity * 75`
//! the bucket array is replaced by one of `next_prime(ceil(capacity * 1.7))` slots
//! and the chains are rebuilt. The order list only holds arena indices, which growth
//! does not move, so iteration order survives any number of resizes.

use bytes::Bytes;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use super::MapError;
use super::prime::next_prime;
use crate::utils::try_copy;

/// Bucket count of a freshly created map.
pub const DEFAULT_CAPACITY: usize = 11;

/// Maximum load, in percent, tolerated before a new key triggers growth.
const MAX_LOAD_PERCENT: usize = 75;

/// Growth factor expressed in tenths (1.7x).
const GROWTH_FACTOR_TENTHS: usize = 17;

#[derive(Debug, Clone)]
struct Entry {
    key: Bytes,
    value: Bytes,
    hash: u64,
    bucket_prev: Option<usize>,
    bucket_next: Option<usize>,
    /// towards the head, i.e. the entry inserted right after this one
    order_prev: Option<usize>,
    /// towards the tail, i.e. the entry inserted right before this one
    order_next: Option<usize>,
}

/// A key/value pair detached from a [`HeaderMap`] by [`HeaderMap::remove_pair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub key: Bytes,
    pub value: Bytes,
}

/// Ordered map from byte-string keys to byte-string values.
///
/// Keys are unique under exact byte comparison. [`keys`](HeaderMap::keys) and
/// [`iter`](HeaderMap::iter) walk entries from the most recently inserted to the
/// oldest; overwriting an existing key keeps its position.
///
/// ```
/// use micro_message::map::HeaderMap;
///
/// let mut map = HeaderMap::new();
/// map.set("connection", "close").unwrap();
/// map.set("content-length", "0").unwrap();
///
/// let keys: Vec<&[u8]> = map.keys().collect();
/// assert_eq!(keys, vec![&b"content-length"[..], &b"connection"[..]]);
/// assert_eq!(map.get("connection"), Some(&b"close"[..]));
/// ```
#[derive(Debug, Clone)]
pub struct HeaderMap {
    entries: Vec<Entry>,
    buckets: Vec<Option<usize>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl Default for HeaderMap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderMap {
    /// Creates an empty map with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map whose bucket count is the smallest prime `>= capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::new(), buckets: vec![None; next_prime(capacity)], head: None, tail: None }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets, always prime.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Inserts `key` with `value`, or replaces the value if `key` is already present.
    ///
    /// Replacing keeps the entry where it is in iteration order. A new key is placed
    /// at the head of the order list, after growing the bucket array if the load
    /// factor is already above 75%.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::OutOfMemory`] if storage for the entry or the grown bucket
    /// array can't be allocated. The map is unchanged in that case.
    pub fn set<K, V>(&mut self, key: K, value: V) -> Result<(), MapError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let hash = hash_key(key);

        if let Some(index) = self.find(key, hash) {
            self.entries[index].value = try_copy(value.as_ref())?;
            return Ok(());
        }

        let entry = Entry {
            key: try_copy(key)?,
            value: try_copy(value.as_ref())?,
            hash,
            bucket_prev: None,
            bucket_next: None,
            order_prev: None,
            order_next: None,
        };

        if self.needs_growth() {
            self.grow()?;
        }

        self.entries.try_reserve(1)?;
        self.entries.push(entry);

        let index = self.entries.len() - 1;
        self.link_bucket_head(index);
        self.link_order_head(index);
        Ok(())
    }

    /// Returns the value stored under `key`.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&[u8]> {
        let key = key.as_ref();
        self.find(key, hash_key(key)).map(|index| &self.entries[index].value[..])
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        let key = key.as_ref();
        self.find(key, hash_key(key)).is_some()
    }

    /// Detaches the entry stored under `key` and hands its key and value to the caller.
    pub fn remove_pair<K: AsRef<[u8]>>(&mut self, key: K) -> Option<HeaderPair> {
        let key = key.as_ref();
        let index = self.find(key, hash_key(key))?;

        self.unlink(index);
        let last = self.entries.len() - 1;
        let removed = self.entries.swap_remove(index);
        if index != last {
            self.relocate(index);
        }

        Some(HeaderPair { key: removed.key, value: removed.value })
    }

    /// Like [`remove_pair`](HeaderMap::remove_pair) but only returns the value.
    pub fn remove_value<K: AsRef<[u8]>>(&mut self, key: K) -> Option<Bytes> {
        self.remove_pair(key).map(|pair| pair.value)
    }

    /// Keys from the most recently inserted to the oldest.
    pub fn keys(&self) -> Keys<'_> {
        Keys { inner: self.iter() }
    }

    /// Key/value pairs in the same order as [`keys`](HeaderMap::keys).
    pub fn iter(&self) -> Iter<'_> {
        Iter { map: self, cursor: self.head, remaining: self.entries.len() }
    }

    fn find(&self, key: &[u8], hash: u64) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }

        let mut cursor = self.buckets[self.bucket_of(hash)];
        while let Some(index) = cursor {
            let entry = &self.entries[index];
            if entry.hash == hash && entry.key == key {
                return Some(index);
            }
            cursor = entry.bucket_next;
        }
        None
    }

    #[allow(clippy::cast_possible_truncation, reason = "the remainder is smaller than the bucket count")]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    #[inline]
    fn needs_growth(&self) -> bool {
        self.entries.len() * 100 > self.buckets.len() * MAX_LOAD_PERCENT
    }

    fn grow(&mut self) -> Result<(), MapError> {
        let old_capacity = self.buckets.len();
        let new_capacity = next_prime((old_capacity * GROWTH_FACTOR_TENTHS).div_ceil(10));

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(new_capacity)?;
        buckets.resize(new_capacity, None);
        self.buckets = buckets;

        // oldest first, so every chain ends up with its most recent entry at the head
        let mut cursor = self.tail;
        while let Some(index) = cursor {
            cursor = self.entries[index].order_prev;
            self.link_bucket_head(index);
        }

        debug!(old_capacity, new_capacity, size = self.entries.len(), "header map grown");
        Ok(())
    }

    fn link_bucket_head(&mut self, index: usize) {
        let bucket = self.bucket_of(self.entries[index].hash);
        let old_head = self.buckets[bucket];

        let entry = &mut self.entries[index];
        entry.bucket_prev = None;
        entry.bucket_next = old_head;

        if let Some(old_head) = old_head {
            self.entries[old_head].bucket_prev = Some(index);
        }
        self.buckets[bucket] = Some(index);
    }

    fn link_order_head(&mut self, index: usize) {
        let old_head = self.head;

        let entry = &mut self.entries[index];
        entry.order_prev = None;
        entry.order_next = old_head;

        match old_head {
            Some(old_head) => self.entries[old_head].order_prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
    }

    fn unlink(&mut self, index: usize) {
        let Entry { hash, bucket_prev, bucket_next, order_prev, order_next, .. } = self.entries[index];

        match bucket_prev {
            Some(prev) => self.entries[prev].bucket_next = bucket_next,
            None => {
                let bucket = self.bucket_of(hash);
                self.buckets[bucket] = bucket_next;
            }
        }
        if let Some(next) = bucket_next {
            self.entries[next].bucket_prev = bucket_prev;
        }

        match order_prev {
            Some(prev) => self.entries[prev].order_next = order_next,
            None => self.head = order_next,
        }
        match order_next {
            Some(next) => self.entries[next].order_prev = order_prev,
            None => self.tail = order_prev,
        }
    }

    /// Re-points every link that referenced the entry `swap_remove` just moved to `index`.
    fn relocate(&mut self, index: usize) {
        let Entry { hash, bucket_prev, bucket_next, order_prev, order_next, .. } = self.entries[index];

        match bucket_prev {
            Some(prev) => self.entries[prev].bucket_next = Some(index),
            None => {
                let bucket = self.bucket_of(hash);
                self.buckets[bucket] = Some(index);
            }
        }
        if let Some(next) = bucket_next {
            self.entries[next].bucket_prev = Some(index);
        }

        match order_prev {
            Some(prev) => self.entries[prev].order_next = Some(index),
            None => self.head = Some(index),
        }
        match order_next {
            Some(next) => self.entries[next].order_prev = Some(index),
            None => self.tail = Some(index),
        }
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`HeaderMap`], most recent first.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    map: &'a HeaderMap,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let entry = &self.map.entries[index];
        self.cursor = entry.order_next;
        self.remaining -= 1;
        Some((&entry.key[..], &entry.value[..]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Iterator over the keys of a [`HeaderMap`], most recent first.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: Iter<'a>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

#[inline]
fn hash_key(key: &[u8]) -> u64 {
    xxh3_64(key)
}
