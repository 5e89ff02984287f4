use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MorseConfig {
    /// Cap on readers + writers across both channels.
    #[serde(default = "defaults::max_connections")]
    pub max_connections: usize,
    /// Per-channel ring size in bytes.
    #[serde(default = "defaults::buffer_capacity")]
    pub buffer_capacity: usize,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// How often a blocked caller re-checks for cancellation.
    #[serde(default = "defaults::wait_poll_ms")]
    pub wait_poll_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

mod defaults {
    pub fn max_connections() -> usize {
        2 // one reader + one writer
    }

    pub fn buffer_capacity() -> usize {
        20
    }

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn wait_poll_ms() -> u64 {
        50
    }
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self {
            max_connections: defaults::max_connections(),
            buffer_capacity: defaults::buffer_capacity(),
            log_level: defaults::log_level(),
            wait_poll_ms: defaults::wait_poll_ms(),
        }
    }
}

impl MorseConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&toml_to_str)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let morse_config: MorseConfig = toml::from_str(text)?;
        morse_config.validate()?;
        Ok(morse_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "max_connections",
                reason: "must be at least 1",
            });
        }
        // One slot is always kept free, so 2 bytes hold a single byte of data.
        if self.buffer_capacity < 2 {
            return Err(ConfigError::Invalid {
                field: "buffer_capacity",
                reason: "must be at least 2",
            });
        }
        if self.wait_poll_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "wait_poll_ms",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(MorseConfig::from_toml("").unwrap(), MorseConfig::default());
    }

    #[test]
    fn overrides() {
        let cfg = MorseConfig::from_toml(
            r#"
            max_connections = 8
            buffer_capacity = 64
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_connections, 8);
        assert_eq!(cfg.buffer_capacity, 64);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.wait_poll_ms, 50);
    }

    #[test]
    fn tiny_buffer_is_rejected() {
        let err = MorseConfig::from_toml("buffer_capacity = 1").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "buffer_capacity",
                ..
            }
        ));
    }

    #[test]
    fn zero_connections_is_rejected() {
        assert!(MorseConfig::from_toml("max_connections = 0").is_err());
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        assert!(matches!(
            MorseConfig::from_toml("lbuf = 20"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MorseConfig::load("/nonexistent/morse.toml").unwrap_err();
        assert_eq!(err.to_string(), "failed to read '/nonexistent/morse.toml'");
    }
}
