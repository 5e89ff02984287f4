mod config;

pub use config::{ConfigError, MorseConfig};
