//! Token signing configuration

use std::fmt;

use crate::{get_env_or_default, get_required_env, parse_duration_string, ConfigError, ConfigResult};

/// Minimum secret length accepted from the environment
const MIN_SECRET_LENGTH: usize = 32;

/// Default token lifetime (15 minutes)
const DEFAULT_TOKEN_TTL_SECS: i64 = 15 * 60;

const DEFAULT_ISSUER: &str = "bastion";
const DEFAULT_AUDIENCE: &str = "bastion";

/// JWT signing configuration shared by the client and the mock service
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token issuer (`iss`)
    pub issuer: String,
    /// Token audience (`aud`)
    pub audience: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl JwtConfig {
    /// Create a configuration with default issuer, audience and lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Load JWT configuration from environment variables
    ///
    /// - `JWT_SECRET` (required, at least 32 characters)
    /// - `JWT_ISSUER` / `JWT_AUDIENCE` (default: `bastion`)
    /// - `JWT_TOKEN_TTL` (duration string such as `15m`, default: 15 minutes)
    pub fn from_env() -> ConfigResult<Self> {
        let secret = get_required_env("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::ValidationError(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_SECRET_LENGTH
            )));
        }

        let token_ttl_secs = match std::env::var("JWT_TOKEN_TTL") {
            Ok(raw) => parse_duration_string(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "JWT_TOKEN_TTL".to_string(),
                    format!("unrecognized duration '{}'", raw),
                )
            })?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(Self {
            secret,
            issuer: get_env_or_default("JWT_ISSUER", DEFAULT_ISSUER),
            audience: get_env_or_default("JWT_AUDIENCE", DEFAULT_AUDIENCE),
            token_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-for-integration-tests-minimum-32-chars";

    #[test]
    fn test_new_defaults() {
        let config = JwtConfig::new(SECRET);
        assert_eq!(config.issuer, "bastion");
        assert_eq!(config.audience, "bastion");
        assert_eq!(config.token_ttl_secs, 900);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug_str = format!("{:?}", JwtConfig::new(SECRET));
        assert!(!debug_str.contains(SECRET));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            vec![
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ISSUER", Some("gateway")),
                ("JWT_AUDIENCE", None),
                ("JWT_TOKEN_TTL", Some("1h")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.issuer, "gateway");
                assert_eq!(config.audience, "bastion");
                assert_eq!(config.token_ttl_secs, 3600);
            },
        );
    }

    #[test]
    fn test_from_env_short_secret() {
        temp_env::with_var("JWT_SECRET", Some("too-short"), || {
            let result = JwtConfig::from_env();
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        });
    }

    #[test]
    fn test_from_env_bad_ttl() {
        temp_env::with_vars(
            vec![("JWT_SECRET", Some(SECRET)), ("JWT_TOKEN_TTL", Some("soon"))],
            || {
                let result = JwtConfig::from_env();
                assert!(matches!(result, Err(ConfigError::InvalidValue(name, _)) if name == "JWT_TOKEN_TTL"));
            },
        );
    }

    #[test]
    fn test_from_env_rejects_negative_and_multibyte_ttl() {
        for ttl in ["-5m", "15分", "9223372036854775807d"] {
            temp_env::with_vars(
                vec![("JWT_SECRET", Some(SECRET)), ("JWT_TOKEN_TTL", Some(ttl))],
                || {
                    let result = JwtConfig::from_env();
                    assert!(
                        matches!(result, Err(ConfigError::InvalidValue(ref name, _)) if name == "JWT_TOKEN_TTL"),
                        "{} was accepted",
                        ttl
                    );
                },
            );
        }
    }
}
