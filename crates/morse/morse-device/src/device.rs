//! The connection gate: attach, detach, and the handles it hands out.

use crate::cancel::CancelToken;
use crate::channel::{
    AccessMode, Blocking, Channel, ChannelState, ChannelStats, Direction, WaitPolicy,
};
use crate::error::DeviceError;
use morse_ring::{ByteRing, RingConfig};
use std::sync::MutexGuard;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shortest poll interval a device will use.
pub const MIN_WAIT_POLL: Duration = Duration::from_millis(1);

/// Limits shared by both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Cap on `readers + writers` summed over both channels.
    pub max_connections: usize,
    /// Ring size allocated for each channel on first attach.
    pub ring: RingConfig,
    /// Upper bound on how long a blocked caller goes without checking its
    /// cancellation token. Raised to [`MIN_WAIT_POLL`] by [`MorseDevice::new`].
    pub wait_poll: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            max_connections: 2,
            ring: RingConfig::new(20),
            wait_poll: Duration::from_millis(50),
        }
    }
}

/// Owns the encode and decode channels.
///
/// Channels live as long as the device; only their rings come and go.
#[derive(Debug)]
pub struct MorseDevice {
    channels: [Channel; 2],
    config: DeviceConfig,
}

impl MorseDevice {
    pub fn new(mut config: DeviceConfig) -> Self {
        config.wait_poll = config.wait_poll.max(MIN_WAIT_POLL);
        Self {
            channels: Direction::ALL.map(Channel::new),
            config,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    #[inline]
    fn channel(&self, direction: Direction) -> &Channel {
        &self.channels[direction.index()]
    }

    /// Locks every channel, always in `Direction::ALL` order.
    fn lock_all(&self) -> [MutexGuard<'_, ChannelState>; 2] {
        [self.channels[0].lock(), self.channels[1].lock()]
    }

    /// Opens a reference to one channel.
    ///
    /// The first attachment to a channel allocates its ring. A
    /// [`AccessMode::ReadWrite`] attachment counts as one reader and one
    /// writer, so it needs two free slots under the cap.
    ///
    /// # Errors
    /// - [`DeviceError::TooManyConnections`] if the new attachment would
    ///   push the total across both channels past `max_connections`.
    /// - [`DeviceError::OutOfMemory`] if the ring cannot be allocated.
    ///
    /// Nothing changes on failure.
    pub fn attach(
        &self,
        direction: Direction,
        mode: AccessMode,
    ) -> Result<Handle<'_>, DeviceError> {
        // The cap spans both channels, so both must be held to check it.
        let mut guards = self.lock_all();
        let total: usize = guards.iter().map(|g| g.attachments()).sum();
        let limit = self.config.max_connections;

        if total + mode.weight() > limit {
            warn!(
                channel = direction.name(),
                total,
                limit,
                "attach rejected: too many connections"
            );
            return Err(DeviceError::TooManyConnections { limit });
        }

        let state = &mut guards[direction.index()];
        if state.ring.is_none() {
            let capacity = self.config.ring.capacity;
            let ring = ByteRing::try_new(self.config.ring)
                .map_err(|_| DeviceError::OutOfMemory { capacity })?;
            debug!(channel = direction.name(), capacity, "buffer allocated");
            state.ring = Some(ring);
        }

        if mode.can_read() {
            state.readers += 1;
        }
        if mode.can_write() {
            state.writers += 1;
        }

        info!(
            channel = direction.name(),
            readers = state.readers,
            writers = state.writers,
            max_connections = limit,
            capacity = self.config.ring.capacity,
            "attached"
        );

        Ok(Handle {
            device: self,
            direction,
            mode,
            cancel: CancelToken::new(),
        })
    }

    fn detach_raw(&self, direction: Direction, mode: AccessMode) {
        let mut state = self.channel(direction).lock();
        if mode.can_read() {
            state.readers = state.readers.saturating_sub(1);
        }
        if mode.can_write() {
            state.writers = state.writers.saturating_sub(1);
        }
        if state.attachments() == 0 && state.ring.take().is_some() {
            debug!(channel = direction.name(), "buffer released");
        }

        info!(
            channel = direction.name(),
            readers = state.readers,
            writers = state.writers,
            max_connections = self.config.max_connections,
            capacity = self.config.ring.capacity,
            "detached"
        );
    }

    /// Current counters and fill level of one channel.
    pub fn stats(&self, direction: Direction) -> ChannelStats {
        self.channel(direction).lock().stats()
    }

    /// Total attachments across both channels.
    pub fn connections(&self) -> usize {
        self.lock_all().iter().map(|g| g.attachments()).sum()
    }
}

impl Default for MorseDevice {
    fn default() -> Self {
        Self::new(DeviceConfig::default())
    }
}

/// One caller's open reference to a channel.
///
/// Dropping the handle detaches it.
#[derive(Debug)]
pub struct Handle<'d> {
    device: &'d MorseDevice,
    direction: Direction,
    mode: AccessMode,
    cancel: CancelToken,
}

impl Handle<'_> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// A token another thread can use to interrupt this handle's waits.
    pub fn canceller(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn policy(&self, blocking: Blocking) -> WaitPolicy<'_> {
        WaitPolicy {
            blocking,
            cancel: &self.cancel,
            poll: self.device.config.wait_poll,
        }
    }

    fn check_readable(&self) -> Result<(), DeviceError> {
        if self.mode.can_read() {
            Ok(())
        } else {
            Err(DeviceError::InvalidAccess {
                reason: "handle not attached for reading",
            })
        }
    }

    fn check_writable(&self) -> Result<(), DeviceError> {
        if self.mode.can_write() {
            Ok(())
        } else {
            Err(DeviceError::InvalidAccess {
                reason: "handle not attached for writing",
            })
        }
    }

    /// Takes up to `max_len` raw bytes off the ring and returns their
    /// conversion.
    ///
    /// The converted output may be longer than `max_len` (encoding expands).
    /// A wrapped ring is drained in two calls.
    ///
    /// # Errors
    /// - [`DeviceError::WouldBlock`] if the ring is empty and `blocking` is
    ///   [`Blocking::NonBlocking`].
    /// - [`DeviceError::Interrupted`] if the token was cancelled while waiting.
    /// - [`DeviceError::InvalidAccess`] if the handle cannot read.
    pub fn read(&self, max_len: usize, blocking: Blocking) -> Result<Vec<u8>, DeviceError> {
        self.check_readable()?;
        self.device
            .channel(self.direction)
            .read(max_len, self.policy(blocking))
    }

    /// Like [`read`](Self::read), but copies the converted bytes into `out`
    /// and returns how many were copied.
    ///
    /// The raw chunk is sized so its conversion always fits.
    ///
    /// # Errors
    /// As for [`read`](Self::read), plus [`DeviceError::InvalidAccess`] when
    /// `out` is too small to hold the conversion of even one byte. That check
    /// happens before the ring is touched.
    pub fn read_into(&self, out: &mut [u8], blocking: Blocking) -> Result<usize, DeviceError> {
        self.check_readable()?;
        let max_raw = self.direction.max_input_for(out.len());
        if max_raw == 0 {
            return Err(DeviceError::InvalidAccess {
                reason: "output buffer too small",
            });
        }

        let converted = self
            .device
            .channel(self.direction)
            .read(max_raw, self.policy(blocking))?;
        out[..converted.len()].copy_from_slice(&converted);
        Ok(converted.len())
    }

    /// Queues as much of `data` as currently fits and returns the count.
    ///
    /// # Errors
    /// - [`DeviceError::WouldBlock`] if the ring is full and `blocking` is
    ///   [`Blocking::NonBlocking`].
    /// - [`DeviceError::Interrupted`] if the token was cancelled while waiting.
    /// - [`DeviceError::InvalidAccess`] if the handle cannot write.
    pub fn write(&self, data: &[u8], blocking: Blocking) -> Result<usize, DeviceError> {
        self.check_writable()?;
        self.device
            .channel(self.direction)
            .write(data, self.policy(blocking))
    }

    /// Blocks until all of `data` has been queued.
    ///
    /// # Errors
    /// Same as [`write`](Self::write) in blocking mode. Bytes queued before
    /// the error stay queued.
    pub fn write_all(&self, mut data: &[u8]) -> Result<(), DeviceError> {
        while !data.is_empty() {
            let n = self.write(data, Blocking::Wait)?;
            data = &data[n..];
        }
        Ok(())
    }

    /// Detaches explicitly. Equivalent to dropping the handle.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for Handle<'_> {
    fn drop(&mut self) {
        self.device.detach_raw(self.direction, self.mode);
    }
}
