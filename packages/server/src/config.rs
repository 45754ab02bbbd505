//! Server configuration.

use std::time::Duration;

use chrono::FixedOffset;
use hiroba_shared::time::fixed_offset_hours;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IDLE_TIMEOUT_MINS: u64 = 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_MIN_MESSAGE_INTERVAL_MS: u64 = 500;
/// Pacific Standard Time
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("UTC offset must be within ±14 hours, got {0}")]
    InvalidUtcOffset(i32),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions idle for longer than this are swept
    pub idle_timeout: Duration,
    pub sweep_interval: Duration,
    /// Minimum gap between two chat messages of one connection
    pub min_message_interval: Duration,
    /// Offset used for message times and HTTP timestamps
    pub utc_offset: FixedOffset,
}

impl ServerConfig {
    /// Build a configuration from raw command-line values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the offset is out of range or an interval is zero.
    pub fn from_raw(
        host: String,
        port: u16,
        idle_timeout_mins: u64,
        sweep_interval_secs: u64,
        min_message_interval_ms: u64,
        utc_offset_hours: i32,
    ) -> Result<Self, ConfigError> {
        if idle_timeout_mins == 0 {
            return Err(ConfigError::ZeroDuration("idle timeout"));
        }
        if sweep_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("sweep interval"));
        }
        let utc_offset = fixed_offset_hours(utc_offset_hours)
            .ok_or(ConfigError::InvalidUtcOffset(utc_offset_hours))?;

        Ok(Self {
            host,
            port,
            idle_timeout: Duration::from_secs(idle_timeout_mins * 60),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            min_message_interval: Duration::from_millis(min_message_interval_ms),
            utc_offset,
        })
    }

    /// Address passed to the listener, `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
