use std::env;
use std::net::SocketAddr;

use crate::error::ConfigError;

const SUPABASE_URL: &str = "SUPABASE_URL";
const SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
const BIND_ADDRESS: &str = "QUOTR_BIND";

/// Runtime configuration of the service. The backend coordinates come from
/// the environment; the bind address can also be set on the command line,
/// which takes precedence over `QUOTR_BIND`.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub service_role_key: String,
    pub bind_address: SocketAddr,
}

impl Config {
    pub fn from_env(bind_override: Option<String>) -> Result<Self, ConfigError> {
        let supabase_url = require(SUPABASE_URL)?;
        let service_role_key = require(SERVICE_ROLE_KEY)?;

        let bind_address = match bind_override.or_else(|| env::var(BIND_ADDRESS).ok()) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddress(raw))?,
            None => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };

        Ok(Config {
            supabase_url,
            service_role_key,
            bind_address,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVariable(name))
}
