//! Environment-driven configuration.
//!
//! Settings come from `ROSTER_*` variables. A `.env` file in the working
//! directory is loaded first if present; real environment variables win over
//! it. Empty values count as unset.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::debug;

use crate::middleware::CorsPolicy;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE: &str = "roster.db";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ROSTER_ADDR `{value}` is not a socket address: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Runtime settings for the server binary.
#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    /// SQLite database file; `:memory:` keeps everything in process.
    pub database: PathBuf,
    /// Handed to the auth layer. Unused while auth is pass-through.
    pub jwt_secret: Option<String>,
    pub cors: CorsPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            database: PathBuf::from(DEFAULT_DATABASE),
            jwt_secret: None,
            cors: CorsPolicy::default(),
        }
    }
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, starting from the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("ROSTER_ADDR") {
            let parsed: Result<SocketAddr, _> = value.trim().parse();
            config.addr = match parsed {
                Ok(addr) => addr,
                Err(source) => return Err(ConfigError::InvalidAddr { value, source }),
            };
        }
        if let Some(database) = get("ROSTER_DATABASE") {
            config.database = PathBuf::from(database);
        }
        if let Some(origins) = get("ROSTER_CORS_ORIGINS") {
            config.cors = config.cors.with_origins(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_owned)
                    .collect(),
            );
        }
        config.jwt_secret = get("ROSTER_JWT_SECRET");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database, PathBuf::from("roster.db"));
        assert_eq!(config.jwt_secret, None);
        assert_eq!(config.cors.allowed_origins, ["*"]);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("ROSTER_ADDR", "127.0.0.1:8080"),
            ("ROSTER_DATABASE", ":memory:"),
            ("ROSTER_JWT_SECRET", "s3cret"),
            ("ROSTER_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.database, PathBuf::from(":memory:"));
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.cors.allowed_origins, ["https://a.example", "https://b.example"]);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("ROSTER_ADDR", " "), ("ROSTER_JWT_SECRET", "")]))
            .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.jwt_secret, None);
    }

    #[test]
    fn rejects_bad_address() {
        let err = Config::from_lookup(lookup(&[("ROSTER_ADDR", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { ref value, .. } if value == "localhost"));
    }
}
