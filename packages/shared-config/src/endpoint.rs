//! Endpoint configuration for the service under test

use crate::{get_env_or_default, parse_required_env, ConfigError, ConfigResult};

/// Scheme used for every request to the service under test
pub const SECURE_SCHEME: &str = "https";

/// Host used when `SERVICE_HOST` is not set
const DEFAULT_HOST: &str = "localhost";

/// Where the secured service under test is listening
///
/// The scheme is always [`SECURE_SCHEME`]; only host, port and base path are
/// configurable. Values are fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    host: String,
    port: u16,
    base_path: String,
}

impl EndpointConfig {
    /// Create an endpoint on `localhost` with the given port and base path
    pub fn new(port: u16, base_path: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            base_path: base_path.into(),
        }
    }

    /// Replace the host (builder style)
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Load endpoint configuration from environment variables
    ///
    /// - `SERVICE_PORT` (required)
    /// - `SERVICE_HOST` (default: `localhost`)
    /// - `SERVICE_BASE_PATH` (default: empty)
    pub fn from_env() -> ConfigResult<Self> {
        let port: u16 = parse_required_env("SERVICE_PORT")?;

        let host = get_env_or_default("SERVICE_HOST", DEFAULT_HOST);
        if host.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SERVICE_HOST".to_string(),
                "host cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_path: get_env_or_default("SERVICE_BASE_PATH", ""),
        })
    }

    /// Always [`SECURE_SCHEME`]
    pub fn scheme(&self) -> &'static str {
        SECURE_SCHEME
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = EndpointConfig::new(8443, "/accumulo/v1");
        assert_eq!(config.scheme(), "https");
        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 8443);
        assert_eq!(config.base_path(), "/accumulo/v1");
    }

    #[test]
    fn test_with_host() {
        let config = EndpointConfig::new(8443, "").with_host("service.internal");
        assert_eq!(config.host(), "service.internal");
        assert_eq!(config.scheme(), "https");
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            vec![
                ("SERVICE_PORT", Some("9443")),
                ("SERVICE_HOST", None),
                ("SERVICE_BASE_PATH", None),
            ],
            || {
                let config = EndpointConfig::from_env().unwrap();
                assert_eq!(config, EndpointConfig::new(9443, ""));
            },
        );
    }

    #[test]
    fn test_from_env_all_set() {
        temp_env::with_vars(
            vec![
                ("SERVICE_PORT", Some("9443")),
                ("SERVICE_HOST", Some("10.0.0.5")),
                ("SERVICE_BASE_PATH", Some("/query/v1")),
            ],
            || {
                let config = EndpointConfig::from_env().unwrap();
                assert_eq!(config.host(), "10.0.0.5");
                assert_eq!(config.base_path(), "/query/v1");
            },
        );
    }

    #[test]
    fn test_from_env_missing_port() {
        temp_env::with_var_unset("SERVICE_PORT", || {
            let result = EndpointConfig::from_env();
            assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
        });
    }

    #[test]
    fn test_from_env_invalid_port() {
        temp_env::with_var("SERVICE_PORT", Some("70000"), || {
            let result = EndpointConfig::from_env();
            assert!(matches!(result, Err(ConfigError::InvalidValue(name, _)) if name == "SERVICE_PORT"));
        });
    }

    #[test]
    fn test_from_env_empty_host() {
        temp_env::with_vars(
            vec![("SERVICE_PORT", Some("9443")), ("SERVICE_HOST", Some("  "))],
            || {
                let result = EndpointConfig::from_env();
                assert!(matches!(result, Err(ConfigError::InvalidValue(_, _))));
            },
        );
    }
}
