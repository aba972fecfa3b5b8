//! Server configuration from environment variables.
//!
//! - `HOST` — bind address (default `0.0.0.0`)
//! - `PORT` — TCP port (default `8080`)
//! - `TIMESTAMP_ACQUIRE_TIMEOUT_MS` — bound on waiting for store access
//! - `TIMESTAMP_LEASE_TIMEOUT_MS` — bound on holding store access
//!
//! Both timeouts are unbounded when unset.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::cell::CellConfig;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub cell: CellConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cell: CellConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read variables through `lookup`; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: parse_var(&lookup, "HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            cell: CellConfig {
                acquire_timeout: parse_var::<u64, _>(&lookup, "TIMESTAMP_ACQUIRE_TIMEOUT_MS")?
                    .map(Duration::from_millis),
                lease_timeout: parse_var::<u64, _>(&lookup, "TIMESTAMP_LEASE_TIMEOUT_MS")?
                    .map(Duration::from_millis),
            },
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map(Some).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}
