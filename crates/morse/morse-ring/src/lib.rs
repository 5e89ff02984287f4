mod ring;

pub use ring::{ByteRing, RingConfig};
