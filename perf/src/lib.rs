//! Shared inputs for the criterion benches.

use morse_device::{DeviceConfig, MorseDevice};
use morse_ring::RingConfig;
use std::time::Duration;

const PANGRAM: &[u8] = b"THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG 1234567890 ";

/// `len` bytes of uppercase text, digits and single spaces.
pub fn sample_text(len: usize) -> Vec<u8> {
    PANGRAM.iter().copied().cycle().take(len).collect()
}

/// Morse for `sample_text(len)`, without the trailing newline.
pub fn sample_morse(len: usize) -> Vec<u8> {
    let mut morse = morse_codec::encode(&sample_text(len));
    morse.pop();
    morse
}

/// A device whose rings hold `capacity` bytes and which allows enough
/// attachments for a reader and a writer on each channel.
pub fn bench_device(capacity: usize) -> MorseDevice {
    MorseDevice::new(DeviceConfig {
        max_connections: 4,
        ring: RingConfig::new(capacity),
        wait_poll: Duration::from_millis(1),
    })
}
