use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use chrono::FixedOffset;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub log_file: Option<PathBuf>,
    pub sample_interval: Duration,
    pub timestamp_offset: FixedOffset,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("MCP_SAMPLE_INTERVAL_MS must be a positive integer")]
    InvalidSampleInterval,
    #[error("MCP_TIMESTAMP_OFFSET_HOURS must be an integer between -23 and 23")]
    InvalidTimestampOffset,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let bind_port = lookup("BIND_PORT")
            .map(|value| value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(5000);
        let log_file = match lookup("MCP_LOG_FILE") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(PathBuf::from(value.trim())),
            None => Some(PathBuf::from("mcp_server.log")),
        };
        let sample_interval = lookup("MCP_SAMPLE_INTERVAL_MS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|millis| *millis > 0)
                    .map(Duration::from_millis)
                    .ok_or(ConfigError::InvalidSampleInterval)
            })
            .transpose()?
            .unwrap_or(Duration::from_secs(1));
        let offset_hours = lookup("MCP_TIMESTAMP_OFFSET_HOURS")
            .map(|value| {
                value
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| ConfigError::InvalidTimestampOffset)
            })
            .transpose()?
            .unwrap_or(8);
        let timestamp_offset = (-23..=23)
            .contains(&offset_hours)
            .then(|| FixedOffset::east_opt(offset_hours * 3600))
            .flatten()
            .ok_or(ConfigError::InvalidTimestampOffset)?;

        let config = Self {
            bind_addr,
            bind_port,
            log_file,
            sample_interval,
            timestamp_offset,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
