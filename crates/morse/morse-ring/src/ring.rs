//! Fixed-capacity circular byte buffer and its configuration.
//!
//! This module provides the storage primitive behind every channel:
//! - Configuration with capacity validation
//! - Cursor arithmetic expressed as modular index math over an owned slice
//! - One reserved slot so that "empty" and "full" never look alike
//!
//! `ByteRing` is not synchronised. The owner is expected to hold a lock for
//! the whole duration of any call.

use std::collections::TryReserveError;

/// Configuration for a byte ring.
///
/// Unlike a sequence-numbered slot ring, the capacity does not need to be a
/// power of two: cursors wrap with `%`. One byte is always kept free, so the
/// usable space is `capacity - 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RingConfig {
    /// Size of the backing store in bytes. Must be at least 2.
    pub capacity: usize,
}

impl RingConfig {
    /// Creates a new ring configuration with the specified capacity.
    ///
    /// # Panics
    /// Panics if `capacity < 2` (a ring of one byte could never hold data).
    ///
    /// # Example
    /// ```
    /// use morse_ring::RingConfig;
    /// let cfg = RingConfig::new(20);
    /// assert_eq!(cfg.usable(), 19);
    /// ```
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "Capacity must be at least 2");
        Self { capacity }
    }

    /// Number of bytes that can be buffered at once.
    #[inline]
    pub fn usable(&self) -> usize {
        self.capacity - 1
    }
}

/// Advances `cursor` by `n` positions on a ring of `capacity` slots.
///
/// ```text
/// capacity = 5
/// cursor = 3, n = 1 → 4
/// cursor = 4, n = 1 → 0  (wraps)
/// cursor = 4, n = 3 → 2
/// ```
#[inline(always)]
fn advance(cursor: usize, n: usize, capacity: usize) -> usize {
    (cursor + n) % capacity
}

/// A circular byte store with separate read and write cursors.
///
/// # Layout
///
/// ```text
///            read            write
///             v                v
/// ┌───┬───┬───┬───┬───┬───┬───┬───┬───┐
/// │   │   │ a │ b │ c │ d │   │   │   │
/// └───┴───┴───┴───┴───┴───┴───┴───┴───┘
///  0                               capacity-1
/// ```
///
/// - Empty iff `read == write`.
/// - Full iff advancing `write` by one would land on `read`.
#[derive(Debug)]
pub struct ByteRing {
    /// Backing storage; its length is the ring capacity.
    buf: Box<[u8]>,
    /// Index of the next byte to hand out.
    read: usize,
    /// Index of the next free slot.
    write: usize,
}

impl ByteRing {
    /// Allocates a zeroed ring.
    pub fn new(cfg: RingConfig) -> Self {
        Self {
            buf: vec![0u8; cfg.capacity].into_boxed_slice(),
            read: 0,
            write: 0,
        }
    }

    /// Allocates a ring, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    /// Returns the allocator error if `cfg.capacity` bytes cannot be reserved.
    pub fn try_new(cfg: RingConfig) -> Result<Self, TryReserveError> {
        let mut storage = Vec::new();
        storage.try_reserve_exact(cfg.capacity)?;
        storage.resize(cfg.capacity, 0);
        Ok(Self {
            buf: storage.into_boxed_slice(),
            read: 0,
            write: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        (self.write + self.capacity() - self.read) % self.capacity()
    }

    /// Bytes that can be written before the ring is full.
    ///
    /// Equals `capacity - 1` exactly when the ring is empty.
    ///
    /// ```text
    /// capacity = 5, read = 3, write = 2
    /// (3 + 5 - 2) % 5 - 1 = 1 - 1 = 0   → full
    /// ```
    #[inline]
    pub fn space_free(&self) -> usize {
        if self.is_empty() {
            return self.capacity() - 1;
        }
        (self.read + self.capacity() - self.write) % self.capacity() - 1
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.space_free() == 0
    }

    /// Copies as much of `data` as currently fits and returns the count.
    ///
    /// The copy is split at the end of the backing store when needed, so a
    /// single call can fill both the tail and the head of the ring. Unread
    /// bytes are never overwritten.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.space_free());
        if n == 0 {
            return 0;
        }

        let cap = self.capacity();
        let first = n.min(cap - self.write);
        self.buf[self.write..self.write + first].copy_from_slice(&data[..first]);
        let rest = n - first;
        if rest > 0 {
            self.buf[..rest].copy_from_slice(&data[first..n]);
        }

        self.write = advance(self.write, n, cap);
        n
    }

    /// Hands out up to `max` contiguous unread bytes.
    ///
    /// The returned slice never crosses the end of the backing store: when
    /// the unread region wraps, the tail comes back from this call and the
    /// head from the next one. An empty slice means the ring is empty (or
    /// `max == 0`).
    pub fn read(&mut self, max: usize) -> &[u8] {
        let cap = self.capacity();
        let contiguous = if self.write >= self.read {
            self.write - self.read
        } else {
            // Writer has wrapped: return data up to the end of the store.
            cap - self.read
        };
        let n = max.min(contiguous);

        let start = self.read;
        self.read = advance(self.read, n, cap);
        &self.buf[start..start + n]
    }

    /// Drops all unread data and rewinds both cursors.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ring_reports_capacity_minus_one() {
        let ring = ByteRing::new(RingConfig::new(20));
        assert!(ring.is_empty());
        assert_eq!(ring.space_free(), 19);
        assert_eq!(ring.len(), 0);
    }

    #[test]
    fn space_free_tracks_writes() {
        let mut ring = ByteRing::new(RingConfig::new(8));
        for k in 1..=7 {
            assert_eq!(ring.write(b"x"), 1);
            assert_eq!(ring.space_free(), 7 - k);
        }
        assert!(ring.is_full());
        assert_eq!(ring.write(b"y"), 0, "full ring must refuse data");
    }

    #[test]
    fn short_write_when_space_is_limited() {
        let mut ring = ByteRing::new(RingConfig::new(5));
        assert_eq!(ring.write(b"abcdefg"), 4);
        assert_eq!(ring.read(10), b"abcd");
        assert!(ring.is_empty());
    }

    /// capacity 5: write 4, read 3, write 3 more. The last write wraps and
    /// the reads come back tail-first, then head.
    #[test]
    fn wrap_preserves_order() {
        let mut ring = ByteRing::new(RingConfig::new(5));
        assert_eq!(ring.write(b"abcd"), 4);
        assert_eq!(ring.read(3), b"abc");
        assert_eq!(ring.space_free(), 3);

        assert_eq!(ring.write(b"efg"), 3);
        assert_eq!(ring.space_free(), 0);
        assert_eq!(ring.len(), 4);

        assert_eq!(ring.read(10), b"de");
        assert_eq!(ring.read(10), b"fg");
        assert_eq!(ring.read(10), b"");
        assert_eq!(ring.space_free(), 4);
    }

    #[test]
    fn space_free_after_wrap_uses_modular_distance() {
        let mut ring = ByteRing::new(RingConfig::new(6));
        ring.write(b"abcde");
        ring.read(4);
        // read = 4, write = 5
        ring.write(b"fg");
        // write wrapped to 1; unread = "efg"
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.space_free(), 6 - 1 - 3);
    }

    #[test]
    fn read_limited_by_max() {
        let mut ring = ByteRing::new(RingConfig::new(10));
        ring.write(b"hello");
        assert_eq!(ring.read(2), b"he");
        assert_eq!(ring.read(0), b"");
        assert_eq!(ring.read(9), b"llo");
    }

    #[test]
    fn clear_resets_cursors() {
        let mut ring = ByteRing::new(RingConfig::new(4));
        ring.write(b"abc");
        ring.read(1);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.space_free(), 3);
    }

    #[test]
    fn try_new_allocates() {
        let ring = ByteRing::try_new(RingConfig::new(32)).expect("small allocation");
        assert_eq!(ring.capacity(), 32);
        assert_eq!(ring.space_free(), 31);
    }

    #[test]
    #[should_panic(expected = "Capacity must be at least 2")]
    fn tiny_capacity_is_rejected() {
        let _ = RingConfig::new(1);
    }
}
