//! Two fixed conversion channels over shared, blocking byte rings.
//!
//! - [`Direction::Encode`] (`MORSE`): callers write ASCII, readers get Morse.
//! - [`Direction::Decode`] (`ESROM`): callers write Morse, readers get ASCII.
//!
//! A [`MorseDevice`] owns both channels and enforces one attachment cap across
//! them. Each channel's ring is allocated on its first attachment and freed
//! on its last detach. Conversion happens on the read side, one contiguous
//! chunk at a time.

mod cancel;
mod channel;
mod device;
mod error;

pub use cancel::CancelToken;
pub use channel::{AccessMode, Blocking, ChannelStats, Direction};
pub use device::{DeviceConfig, Handle, MIN_WAIT_POLL, MorseDevice};
pub use error::DeviceError;
