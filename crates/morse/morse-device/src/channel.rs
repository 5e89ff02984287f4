//! One conversion channel: counters, an optional ring, and two conditions.
//!
//! # Locking
//!
//! A single mutex per channel covers the reader/writer counts and the ring.
//! Allocation and release of the ring are tied to the counts crossing zero,
//! so splitting them across two locks would only add ordering hazards.
//!
//! # Waiting
//!
//! ```text
//! lock ──► ready? ──yes──► move bytes ──► unlock ──► notify other side
//!            │
//!            no ──► non-blocking? ──► WouldBlock
//!            │
//!            └────► cancelled? ──► Interrupted
//!            │
//!            └────► wait_timeout (unlocks, relocks) ──► ready? ...
//! ```
//!
//! The predicate is re-checked after every wake, so spurious wakeups and
//! notifications that race with the wait are both harmless.

use crate::cancel::CancelToken;
use crate::error::DeviceError;
use morse_codec::{decode, decoded_len_bound, encode, encoded_len_bound};
use morse_ring::ByteRing;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Conversion direction of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// ASCII in, Morse out.
    Encode,
    /// Morse in, ASCII out.
    Decode,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Encode, Direction::Decode];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Direction::Encode => 0,
            Direction::Decode => 1,
        }
    }

    /// Name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Encode => "MORSE",
            Direction::Decode => "ESROM",
        }
    }

    /// Converts one raw chunk pulled from the ring.
    pub fn convert(self, raw: &[u8]) -> Vec<u8> {
        match self {
            Direction::Encode => encode(raw),
            Direction::Decode => decode(raw),
        }
    }

    /// Largest converted size of `input_len` raw bytes.
    pub fn output_bound(self, input_len: usize) -> usize {
        match self {
            Direction::Encode => encoded_len_bound(input_len),
            Direction::Decode => decoded_len_bound(input_len),
        }
    }

    /// Largest raw chunk whose converted form is guaranteed to fit in
    /// `out_len` bytes. Zero when not even one byte fits.
    pub fn max_input_for(self, out_len: usize) -> usize {
        match self {
            Direction::Encode => (out_len / encoded_len_bound(0)).saturating_sub(1),
            Direction::Decode => out_len.saturating_sub(decoded_len_bound(0)),
        }
    }
}

/// What a handle was attached for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    #[inline]
    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::Read | AccessMode::ReadWrite)
    }

    #[inline]
    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::Write | AccessMode::ReadWrite)
    }

    /// Attachments this mode counts against the connection cap.
    #[inline]
    pub fn weight(self) -> usize {
        usize::from(self.can_read()) + usize::from(self.can_write())
    }
}

/// Whether a read/write may sleep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Blocking {
    #[default]
    Wait,
    NonBlocking,
}

/// Snapshot of a channel's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelStats {
    pub readers: usize,
    pub writers: usize,
    pub buffer_allocated: bool,
    /// Unread bytes (0 when no buffer is allocated).
    pub buffered: usize,
    /// Writable bytes (0 when no buffer is allocated).
    pub space_free: usize,
}

/// Everything guarded by the channel mutex.
#[derive(Debug, Default)]
pub(crate) struct ChannelState {
    pub(crate) readers: usize,
    pub(crate) writers: usize,
    /// `Some` iff `readers + writers > 0`.
    pub(crate) ring: Option<ByteRing>,
}

impl ChannelState {
    #[inline]
    pub(crate) fn attachments(&self) -> usize {
        self.readers + self.writers
    }

    fn has_data(&self) -> bool {
        self.ring.as_ref().is_some_and(|r| !r.is_empty())
    }

    fn has_space(&self) -> bool {
        self.ring.as_ref().is_some_and(|r| !r.is_full())
    }

    fn ring_mut(&mut self) -> Result<&mut ByteRing, DeviceError> {
        self.ring.as_mut().ok_or(DeviceError::InvalidAccess {
            reason: "channel has no buffer",
        })
    }

    pub(crate) fn stats(&self) -> ChannelStats {
        ChannelStats {
            readers: self.readers,
            writers: self.writers,
            buffer_allocated: self.ring.is_some(),
            buffered: self.ring.as_ref().map_or(0, ByteRing::len),
            space_free: self.ring.as_ref().map_or(0, ByteRing::space_free),
        }
    }
}

/// Wait parameters shared by reads and writes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WaitPolicy<'a> {
    pub(crate) blocking: Blocking,
    pub(crate) cancel: &'a CancelToken,
    pub(crate) poll: Duration,
}

#[derive(Debug)]
pub(crate) struct Channel {
    direction: Direction,
    state: Mutex<ChannelState>,
    /// Signalled after a write makes data available.
    not_empty: Condvar,
    /// Signalled after a read frees space.
    not_full: Condvar,
}

impl Channel {
    pub(crate) fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: Mutex::new(ChannelState::default()),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Locks the channel state.
    ///
    /// State is only mutated after data movement succeeds, so a guard left
    /// behind by a panicking thread still holds consistent state.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_until<'g>(
        &self,
        mut guard: MutexGuard<'g, ChannelState>,
        cond: &Condvar,
        ready: fn(&ChannelState) -> bool,
        policy: WaitPolicy<'_>,
        op: &'static str,
    ) -> Result<MutexGuard<'g, ChannelState>, DeviceError> {
        while !ready(&guard) {
            if policy.blocking == Blocking::NonBlocking {
                return Err(DeviceError::WouldBlock);
            }
            if policy.cancel.is_cancelled() {
                return Err(DeviceError::Interrupted);
            }
            debug!(channel = self.direction.name(), op, "going to sleep");
            let (g, _timeout) = cond
                .wait_timeout(guard, policy.poll)
                .unwrap_or_else(PoisonError::into_inner);
            guard = g;
        }
        Ok(guard)
    }

    /// Pops up to `max_len` contiguous raw bytes and converts them.
    pub(crate) fn read(
        &self,
        max_len: usize,
        policy: WaitPolicy<'_>,
    ) -> Result<Vec<u8>, DeviceError> {
        if max_len == 0 {
            return Ok(Vec::new());
        }

        let raw = {
            let guard = self.lock();
            let mut guard =
                self.wait_until(guard, &self.not_empty, ChannelState::has_data, policy, "read")?;
            let ring = guard.ring_mut()?;
            ring.read(max_len).to_vec()
        };

        // Space was freed: wake any writer sleeping on a full ring.
        self.not_full.notify_all();

        let out = self.direction.convert(&raw);
        debug!(
            channel = self.direction.name(),
            raw = raw.len(),
            converted = out.len(),
            "read"
        );
        Ok(out)
    }

    /// Queues as much of `data` as fits, sleeping while the ring is full.
    pub(crate) fn write(&self, data: &[u8], policy: WaitPolicy<'_>) -> Result<usize, DeviceError> {
        if data.is_empty() {
            return Ok(0);
        }

        let written = {
            let guard = self.lock();
            let mut guard =
                self.wait_until(guard, &self.not_full, ChannelState::has_space, policy, "write")?;
            let ring = guard.ring_mut()?;
            ring.write(data)
        };

        // Data arrived: wake readers blocked on an empty ring.
        self.not_empty.notify_all();

        debug!(
            channel = self.direction.name(),
            requested = data.len(),
            written,
            "write"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights() {
        assert_eq!(AccessMode::Read.weight(), 1);
        assert_eq!(AccessMode::Write.weight(), 1);
        assert_eq!(AccessMode::ReadWrite.weight(), 2);
    }

    #[test]
    fn max_input_keeps_output_in_bounds() {
        for dir in Direction::ALL {
            for out_len in 0..64 {
                let n = dir.max_input_for(out_len);
                if n > 0 {
                    assert!(dir.output_bound(n) <= out_len, "{dir:?} {out_len}");
                }
            }
        }
        assert_eq!(Direction::Encode.max_input_for(11), 0);
        assert_eq!(Direction::Encode.max_input_for(12), 1);
        assert_eq!(Direction::Decode.max_input_for(1), 0);
        assert_eq!(Direction::Decode.max_input_for(2), 1);
    }

    #[test]
    fn detached_channel_reports_no_buffer() {
        let ch = Channel::new(Direction::Encode);
        let stats = ch.lock().stats();
        assert!(!stats.buffer_allocated);
        assert_eq!(stats.space_free, 0);
    }
}
