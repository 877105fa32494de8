use crate::codec::{MAX_BODY_BYTES, MAX_HEADER_BYTES};

/// Initial capacity of the per-connection read buffer
pub const READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Per-connection settings for [`HttpConnection`](super::HttpConnection).
///
/// ```
/// use micro_message::connection::ConnectionConfig;
///
/// let config = ConnectionConfig::default().with_max_body_bytes(64 * 1024);
/// assert_eq!(config.max_body_bytes(), 64 * 1024);
/// assert_eq!(config.max_header_bytes(), 8 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    read_buffer_capacity: usize,
    max_header_bytes: usize,
    max_body_bytes: usize,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }

    /// Caps the bytes buffered before the end of the header block is seen.
    #[must_use]
    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    /// Caps the `content-length` a request may declare.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn read_buffer_capacity(&self) -> usize {
        self.read_buffer_capacity
    }

    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_capacity: READ_BUFFER_CAPACITY,
            max_header_bytes: MAX_HEADER_BYTES,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}
