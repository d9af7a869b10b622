//! Store Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

use chrono::Utc;

// == Entry Data ==
/// The two value shapes the store understands.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    /// A plain byte string (`GET`/`SET`/`INCR`)
    Bytes(Vec<u8>),
    /// An append-only list of byte strings (`RPUSH`/`LRANGE`)
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// Represents a single store entry with value and metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub data: EntryData,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `data` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(data: EntryData, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        let expires_at =
            ttl_seconds.map(|ttl| now.saturating_add((ttl as i64).saturating_mul(1000)));

        Self { data, expires_at }
    }

    /// Creates a byte-string entry without expiry.
    pub fn bytes(value: Vec<u8>) -> Self {
        Self::new(EntryData::Bytes(value), None)
    }

    /// Creates an empty list entry without expiry.
    pub fn empty_list() -> Self {
        Self::new(EntryData::List(Vec::new()), None)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at
            .map(|expires| (expires - current_timestamp_ms()).max(0) as u64)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
