//! Runtime configuration from the environment
//!
//! Binaries call `dotenv::dotenv()` first so a local `.env` file works too.

use crate::error::DashboardError;
use crate::Result;
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_PHONE_NUMBER: &str = "9999999999";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the AI backend, without trailing slash
    pub backend_url: String,
    pub session_id: String,
    pub phone_number: String,
    /// Port for the dashboard API server
    pub port: u16,
    /// Optional per-request timeout for backend calls
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = get("WALLETSENSE_BACKEND_URL")
            .or_else(|| get("BACKEND_URL"))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let phone_number =
            get("WALLETSENSE_PHONE").unwrap_or_else(|| DEFAULT_PHONE_NUMBER.to_string());

        let session_id = get("WALLETSENSE_SESSION_ID")
            .unwrap_or_else(|| stable_uuid_from_string(&phone_number).to_string());

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                DashboardError::ConfigError(format!("invalid port '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let request_timeout = match get("BACKEND_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    DashboardError::ConfigError(format!("invalid BACKEND_TIMEOUT_SECS '{}'", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            backend_url,
            session_id,
            phone_number,
            port,
            request_timeout,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            session_id: stable_uuid_from_string(DEFAULT_PHONE_NUMBER).to_string(),
            phone_number: DEFAULT_PHONE_NUMBER.to_string(),
            port: DEFAULT_PORT,
            request_timeout: None,
        }
    }
}

/// Deterministic v4-shaped UUID derived from a seed string
pub fn stable_uuid_from_string(input: &str) -> Uuid {
    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.port, 8080);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_overrides_and_fallback_key() {
        let config = Config::from_lookup(lookup(&[
            ("BACKEND_URL", "https://api.example.test/"),
            ("WALLETSENSE_PHONE", "5550001"),
            ("API_PORT", "9090"),
            ("BACKEND_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "https://api.example.test");
        assert_eq!(config.phone_number, "5550001");
        assert_eq!(config.session_id, stable_uuid_from_string("5550001").to_string());
        assert_eq!(config.port, 9090);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_primary_key_wins() {
        let config = Config::from_lookup(lookup(&[
            ("WALLETSENSE_BACKEND_URL", "http://primary"),
            ("BACKEND_URL", "http://secondary"),
            ("WALLETSENSE_SESSION_ID", "test-session"),
        ]))
        .unwrap();
        assert_eq!(config.backend_url, "http://primary");
        assert_eq!(config.session_id, "test-session");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigError(_)));
    }

    #[test]
    fn test_stable_uuid() {
        let a = stable_uuid_from_string("9999999999");
        assert_eq!(a, stable_uuid_from_string("9999999999"));
        assert_eq!(a.get_version_num(), 4);
        assert_ne!(a, stable_uuid_from_string("1111111111"));
    }
}
