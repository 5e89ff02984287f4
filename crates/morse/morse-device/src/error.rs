/// Failures surfaced by attach, read and write.
///
/// None of these leave a channel half-updated: counters and cursors only
/// move after the operation has fully succeeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("too many connections (limit {limit})")]
    TooManyConnections { limit: usize },

    #[error("failed to allocate a {capacity}-byte buffer")]
    OutOfMemory { capacity: usize },

    #[error("operation would block")]
    WouldBlock,

    #[error("wait interrupted")]
    Interrupted,

    #[error("invalid access: {reason}")]
    InvalidAccess { reason: &'static str },
}

impl DeviceError {
    /// Whether retrying the same call later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::TooManyConnections { .. } | Self::WouldBlock | Self::Interrupted
        )
    }
}
