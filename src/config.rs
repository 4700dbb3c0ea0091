//! Service configuration, read from `LIVER_RISK_*` environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const HOST_ENV: &str = "LIVER_RISK_HOST";
pub const PORT_ENV: &str = "LIVER_RISK_PORT";
pub const ARTIFACT_DIR_ENV: &str = "LIVER_RISK_ARTIFACT_DIR";
pub const MAX_INFLIGHT_ENV: &str = "LIVER_RISK_MAX_INFLIGHT";
pub const LOG_MODE_ENV: &str = "LIVER_RISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "LIVER_RISK_LOG_FILE";

const DEFAULT_PORT: u16 = 8001;
const DEFAULT_LOG_FILE: &str = "liver_risk.log";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Stdout,
    File,
}

impl LogMode {
    /// Anything other than `file` logs to stdout.
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("file") {
            Self::File
        } else {
            Self::Stdout
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Base directory the candidate artifact paths are resolved against
    pub artifact_dir: PathBuf,
    /// Maximum number of predictions running at once
    pub max_inflight: usize,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            artifact_dir: PathBuf::from("."),
            max_inflight: default_max_inflight(),
            log_mode: LogMode::Stdout,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn default_max_inflight() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(HOST_ENV) {
            config.host = raw.trim().parse().map_err(|e| invalid(HOST_ENV, &raw, e))?;
        }
        if let Some(raw) = get(PORT_ENV) {
            config.port = raw.trim().parse().map_err(|e| invalid(PORT_ENV, &raw, e))?;
        }
        if let Some(raw) = get(ARTIFACT_DIR_ENV) {
            config.artifact_dir = PathBuf::from(raw);
        }
        if let Some(raw) = get(MAX_INFLIGHT_ENV) {
            let n: usize = raw
                .trim()
                .parse()
                .map_err(|e| invalid(MAX_INFLIGHT_ENV, &raw, e))?;
            if n == 0 {
                return Err(invalid(MAX_INFLIGHT_ENV, &raw, "must be at least 1"));
            }
            config.max_inflight = n;
        }
        if let Some(raw) = get(LOG_MODE_ENV) {
            config.log_mode = LogMode::parse(raw.trim());
        }
        if let Some(raw) = get(LOG_FILE_ENV) {
            config.log_file = PathBuf::from(raw);
        }

        Ok(config)
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
