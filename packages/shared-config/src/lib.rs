//! Shared configuration types for Bastion test tooling
//!
//! This crate provides the configuration consumed by the JWT client and the
//! test helpers: where the service under test listens, and how request
//! tokens are signed. Everything is read from environment variables, with
//! an optional `.env` file loaded through [`load_dotenv`].

mod endpoint;
mod error;
mod jwt;

pub use endpoint::{EndpointConfig, SECURE_SCHEME};
pub use error::{ConfigError, ConfigResult};
pub use jwt::JwtConfig;

use std::env;

/// Load variables from a `.env` file if one exists
///
/// Missing files are ignored; variables already present in the process
/// environment take precedence.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Helper function to get a required environment variable
pub fn get_required_env(name: &str) -> ConfigResult<String> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Helper function to get an optional environment variable with a default
pub fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper function to parse a required environment variable into a specific type
pub fn parse_required_env<T>(name: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_required_env(name)?
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))
}

/// Parse duration strings like "15m", "7d", "24h" to seconds
///
/// Returns `None` for unknown units, non-positive amounts and values that
/// overflow an `i64` of seconds.
pub fn parse_duration_string(s: &str) -> Option<i64> {
    let s = s.trim();
    let (split, _) = s.char_indices().last()?;
    let (num_str, unit) = s.split_at(split);
    let num: i64 = num_str.parse().ok()?;
    if num <= 0 {
        return None;
    }

    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 24 * 3600,
        _ => return None,
    };
    num.checked_mul(multiplier)
}
