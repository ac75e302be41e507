//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// TCP upstream behind `/ssh`, speaking a raw terminal byte stream.
    pub terminal_upstream: String,

    /// Optional TCP upstream behind `/websockify` (binary frames).
    pub binary_upstream: Option<String>,

    /// Master switch for the `/ws` dial-through endpoint.
    pub dial_enabled: bool,

    /// `host:port` targets `/ws` may dial. Empty means any target.
    pub dial_allowlist: Vec<String>,

    /// Maximum bytes read from an upstream per WebSocket frame.
    pub relay_buffer_size: usize,

    /// Seconds to wait for an upstream TCP connect.
    pub upstream_connect_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            terminal_upstream: "127.0.0.1:2222".to_string(),
            binary_upstream: None,
            dial_enabled: true,
            dial_allowlist: Vec::new(),
            relay_buffer_size: 1024,
            upstream_connect_timeout_secs: 5,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let terminal_upstream =
            std::env::var("TERMINAL_UPSTREAM").unwrap_or(defaults.terminal_upstream);
        let binary_upstream = std::env::var("BINARY_UPSTREAM")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let dial_enabled = parse_env_bool("DIAL_ENABLED", defaults.dial_enabled);
        let dial_allowlist = std::env::var("DIAL_ALLOWLIST")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let relay_buffer_size =
            parse_env("RELAY_BUFFER_SIZE", defaults.relay_buffer_size).max(1);
        let upstream_connect_timeout_secs = parse_env(
            "UPSTREAM_CONNECT_TIMEOUT_SECS",
            defaults.upstream_connect_timeout_secs,
        );

        Ok(Self {
            listen_addr,
            terminal_upstream,
            binary_upstream,
            dial_enabled,
            dial_allowlist,
            relay_buffer_size,
            upstream_connect_timeout_secs,
        })
    }

    /// Upstream connect timeout as a [`Duration`].
    #[must_use]
    pub const fn upstream_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_connect_timeout_secs)
    }

    /// Returns `true` if `/ws` may dial `address`.
    #[must_use]
    pub fn dial_allowed(&self, address: &str) -> bool {
        self.dial_allowlist.is_empty() || self.dial_allowlist.iter().any(|a| a == address)
    }
}

/// Log line format, selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT` (`text` or `json`). Unset or unknown values fall
    /// back to [`LogFormat::Text`].
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| parse_log_format(&v))
            .unwrap_or_default()
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" | "pretty" => Some(LogFormat::Text),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Splits a comma-separated list, dropping blanks.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn parse_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_list(" a:1, ,b:2,"),
            vec!["a:1".to_string(), "b:2".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn parse_log_format_accepts_text_and_json() {
        assert_eq!(parse_log_format("json"), Some(LogFormat::Json));
        assert_eq!(parse_log_format(" JSON "), Some(LogFormat::Json));
        assert_eq!(parse_log_format("text"), Some(LogFormat::Text));
        assert_eq!(parse_log_format("xml"), None);
    }

    #[test]
    fn empty_allowlist_allows_everything() {
        let config = RelayConfig::default();
        assert!(config.dial_allowed("anything:1"));
    }

    #[test]
    fn allowlist_is_exact_match() {
        let config = RelayConfig {
            dial_allowlist: vec!["127.0.0.1:5900".to_string()],
            ..RelayConfig::default()
        };
        assert!(config.dial_allowed("127.0.0.1:5900"));
        assert!(!config.dial_allowed("127.0.0.1:22"));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = RelayConfig::default();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.relay_buffer_size, 1024);
        assert_eq!(config.upstream_connect_timeout(), Duration::from_secs(5));
        assert!(config.binary_upstream.is_none());
        assert!(config.dial_enabled);
    }
}
