//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, optionally overridden by command-line
//! flags, and validated before the server starts.
//!
//! ```bash
//! export DATABASE_URL="sqlite://puny-url.db?mode=rwc"
//! export LISTEN="0.0.0.0:8080"
//! export EVICT_INTERVAL=500ms
//! export CACHE_TTL=30
//! ```
//!
//! Durations are whole seconds (`30`) or a sequence of `<number><unit>` parts with
//! units `ms`, `s`, `m` and `h` (`500ms`, `1m30s`, `1.5h`).
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite database (default: `sqlite://puny-url.db?mode=rwc`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `BASE_URL` - Prefix for generated short URLs (default: `http://localhost:<port>/`)
//! - `EVICT_INTERVAL` - Duration between cache sweeps (default: `1s`)
//! - `CACHE_TTL` - How long an unused cache entry survives (default: `30s`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `LOG_SILENT` - Only log warnings and errors (default: `false`)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)

use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://puny-url.db?mode=rwc";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PORT: u16 = 8080;

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(ms|s|m|h)").expect("duration regex is valid")
});

/// Parses a duration such as `30`, `500ms`, `2m` or `1m30s`.
///
/// A bare integer is a number of seconds.
///
/// # Errors
///
/// Returns an error if the input is empty or contains anything other than
/// `<number><unit>` parts.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();

    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut consumed = 0;

    for caps in DURATION_PART.captures_iter(input) {
        let (Some(whole), Some(value), Some(unit)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            anyhow::bail!("Invalid duration '{}'", input);
        };
        if whole.start() != consumed {
            anyhow::bail!("Invalid duration '{}'", input);
        }
        consumed = whole.end();

        let value: f64 = value
            .as_str()
            .parse()
            .with_context(|| format!("Invalid duration '{}'", input))?;
        let unit_millis = match unit.as_str() {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            other => anyhow::bail!("Unknown duration unit '{}'", other),
        };

        total += Duration::try_from_secs_f64(value * unit_millis / 1_000.0)
            .with_context(|| format!("Duration '{}' is out of range", input))?;
    }

    if consumed == 0 || consumed != input.len() {
        anyhow::bail!(
            "Invalid duration '{}', expected e.g. '30', '500ms' or '1m30s'",
            input
        );
    }

    Ok(total)
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Explicit `BASE_URL`; derived from the listen port when unset.
    pub base_url: Option<String>,
    pub evict_interval: Duration,
    pub cache_ttl: Duration,
    pub log_level: String,
    pub log_format: String,
    /// Raises the log level to `warn`.
    pub silent: bool,
    pub db_max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            base_url: None,
            evict_interval: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(30),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            silent: false,
            db_max_connections: 5,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparseable numeric and duration values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let listen_addr = env::var("LISTEN").unwrap_or(defaults.listen_addr);
        let base_url = env::var("BASE_URL").ok().filter(|v| !v.is_empty());
        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        let evict_interval = env::var("EVICT_INTERVAL")
            .ok()
            .and_then(|v| parse_duration(&v).ok())
            .unwrap_or(defaults.evict_interval);

        let cache_ttl = env::var("CACHE_TTL")
            .ok()
            .and_then(|v| parse_duration(&v).ok())
            .unwrap_or(defaults.cache_ttl);

        let silent = env::var("LOG_SILENT")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(defaults.silent);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.db_max_connections);

        Self {
            database_url,
            listen_addr,
            base_url,
            evict_interval,
            cache_ttl,
            log_level,
            log_format,
            silent,
            db_max_connections,
        }
    }

    /// Replaces the port of the listen address, keeping the host.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.listen_addr = format!("{}:{}", host, port);
    }

    /// Port of the listen address, if it has one.
    pub fn port(&self) -> Option<u16> {
        self.listen_addr
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
    }

    /// Prefix for generated short URLs.
    pub fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            format!(
                "http://localhost:{}/",
                self.port().unwrap_or(DEFAULT_PORT)
            )
        })
    }

    /// Log filter directive, honoring silent mode.
    pub fn effective_log_level(&self) -> &str {
        if self.silent { "warn" } else { self.log_level.as_str() }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not a `host:port` socket address
    /// - `database_url` is not a SQLite URL
    /// - `base_url` is not an HTTP(S) URL
    /// - the eviction interval, TTL or pool size is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        self.listen_addr.parse::<SocketAddr>().with_context(|| {
            format!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            )
        })?;

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if let Some(ref base_url) = self.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                base_url
            );
        }

        if self.evict_interval.is_zero() {
            anyhow::bail!("EVICT_INTERVAL must be greater than 0");
        }

        if self.cache_ttl.is_zero() {
            anyhow::bail!("CACHE_TTL must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(())
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url());
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::warn!("Interval for eviction job set to {:?}", self.evict_interval);
        tracing::warn!("TTL set to {:?}", self.cache_ttl);
    }
}
