//! Server configuration from environment variables.

use anyhow::{Context, Result};

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Default upload size limit (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Runtime settings for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`KEYFILL_ADDR`).
    pub addr: String,
    /// Largest accepted request body in bytes (`KEYFILL_MAX_UPLOAD_BYTES`).
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup; unset variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(addr) = lookup("KEYFILL_ADDR").filter(|v| !v.trim().is_empty()) {
            config.addr = addr.trim().to_string();
        }
        if let Some(limit) = lookup("KEYFILL_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid KEYFILL_MAX_UPLOAD_BYTES: '{limit}'"))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("KEYFILL_ADDR", "127.0.0.1:8080"),
            ("KEYFILL_MAX_UPLOAD_BYTES", " 1024 "),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_limit() {
        let err = ServerConfig::from_lookup(lookup(&[("KEYFILL_MAX_UPLOAD_BYTES", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("KEYFILL_MAX_UPLOAD_BYTES"));
    }
}
