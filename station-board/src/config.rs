//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::scheduler::{DEFAULT_REFRESH_INTERVAL, SchedulerConfig};
use crate::search::DEFAULT_RESULT_CAP;
use crate::source::{DEFAULT_HOST, DEFAULT_PORT, SourceConfig};

pub const ENV_API_HOST: &str = "BOARD_API_HOST";
pub const ENV_API_PORT: &str = "BOARD_API_PORT";
pub const ENV_API_TIMEOUT_SECS: &str = "BOARD_API_TIMEOUT_SECS";
pub const ENV_REFRESH_SECS: &str = "BOARD_REFRESH_SECS";
pub const ENV_RESULT_CAP: &str = "BOARD_RESULT_CAP";
pub const ENV_TIMEZONE: &str = "BOARD_TIMEZONE";
pub const ENV_LISTEN_ADDR: &str = "BOARD_LISTEN_ADDR";
pub const ENV_MOCK_DIR: &str = "BOARD_MOCK_DIR";

/// Default address the web server binds to.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Errors building configuration or startup resources.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error("mock data at {path}: {message}")]
    MockData { path: String, message: String },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub scheduler: SchedulerConfig,
    /// Maximum number of station search results.
    pub result_cap: usize,
    /// Timezone used to render times.
    pub timezone: Tz,
    pub listen_addr: SocketAddr,
    /// Serve static data from this directory instead of the HTTP provider.
    pub mock_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Unset or empty variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get(ENV_API_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(get(ENV_API_PORT), ENV_API_PORT, DEFAULT_PORT)?;
        let timeout_secs = parse_or(
            get(ENV_API_TIMEOUT_SECS),
            ENV_API_TIMEOUT_SECS,
            SourceConfig::default().timeout_secs,
        )?;
        let source = SourceConfig::new(&host, port).with_timeout(timeout_secs);

        let refresh_secs = parse_or(
            get(ENV_REFRESH_SECS),
            ENV_REFRESH_SECS,
            DEFAULT_REFRESH_INTERVAL.as_secs(),
        )?;
        if refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_REFRESH_SECS,
                message: "must be greater than zero".into(),
            });
        }
        let scheduler =
            SchedulerConfig::default().with_refresh_interval(Duration::from_secs(refresh_secs));

        let result_cap = parse_or(get(ENV_RESULT_CAP), ENV_RESULT_CAP, DEFAULT_RESULT_CAP)?;
        let timezone = parse_or(get(ENV_TIMEZONE), ENV_TIMEZONE, Tz::UTC)?;
        let listen_addr = match get(ENV_LISTEN_ADDR) {
            Some(raw) => parse(&raw, ENV_LISTEN_ADDR)?,
            None => parse(DEFAULT_LISTEN_ADDR, ENV_LISTEN_ADDR)?,
        };
        let mock_dir = get(ENV_MOCK_DIR).map(PathBuf::from);

        Ok(Self {
            source,
            scheduler,
            result_cap,
            timezone,
            listen_addr,
            mock_dir,
        })
    }
}

fn parse<T>(raw: &str, name: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        message: format!("{raw:?}: {e}"),
    })
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map_or(Ok(default), |raw| parse(&raw, name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.source.base_url, "http://127.0.0.1:3000/api");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.scheduler.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.result_cap, 20);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.listen_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            (ENV_API_HOST, "10.0.0.5"),
            (ENV_API_PORT, "4000"),
            (ENV_API_TIMEOUT_SECS, "5"),
            (ENV_REFRESH_SECS, "60"),
            (ENV_RESULT_CAP, "10"),
            (ENV_TIMEZONE, "Europe/Helsinki"),
            (ENV_LISTEN_ADDR, "0.0.0.0:9000"),
            (ENV_MOCK_DIR, "/tmp/boards"),
        ])
        .unwrap();

        assert_eq!(config.source.base_url, "http://10.0.0.5:4000/api");
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.scheduler.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.result_cap, 10);
        assert_eq!(config.timezone, chrono_tz::Europe::Helsinki);
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.mock_dir, Some(PathBuf::from("/tmp/boards")));
    }

    #[test]
    fn empty_values_take_defaults() {
        let config = config(&[(ENV_API_PORT, ""), (ENV_MOCK_DIR, "  ")]).unwrap();
        assert!(config.source.base_url.ends_with(":3000/api"));
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        let err = config(&[(ENV_API_PORT, "seventy")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_API_PORT, .. }));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = config(&[(ENV_TIMEZONE, "Mars/Olympus")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_TIMEZONE, .. }));
    }

    #[test]
    fn rejects_zero_refresh() {
        let err = config(&[(ENV_REFRESH_SECS, "0")]).unwrap_err();
        assert!(err.to_string().contains(ENV_REFRESH_SECS));
    }
}
