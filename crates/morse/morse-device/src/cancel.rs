use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation for blocked reads and writes.
///
/// Clones share the same flag. A waiter checks the flag every time it wakes
/// (at least once per poll interval) and gives up with
/// [`DeviceError::Interrupted`](crate::DeviceError::Interrupted).
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Waiters are not woken; a blocked call returns
    /// [`DeviceError::Interrupted`](crate::DeviceError::Interrupted) at its
    /// next poll, so interruption can lag by up to the device's `wait_poll`.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Re-arms the token so the next wait blocks normally again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
