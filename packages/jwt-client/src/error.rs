//! Error types for the JWT client

use reqwest::StatusCode;
use thiserror::Error;

/// An error that carries the raw HTTP status code of a failed response
pub trait HttpStatusCodeError: std::error::Error {
    /// Numeric HTTP status code, e.g. `403`
    fn raw_status_code(&self) -> u16;
}

/// The service answered with a 4xx status
#[derive(Error, Debug, Clone)]
#[error("{status} from {uri}: {body}")]
pub struct HttpClientError {
    status: StatusCode,
    uri: String,
    body: String,
}

/// The service answered with a 5xx (or otherwise unexpected) status
#[derive(Error, Debug, Clone)]
#[error("{status} from {uri}: {body}")]
pub struct HttpServerError {
    status: StatusCode,
    uri: String,
    body: String,
}

macro_rules! status_error_impl {
    ($ty:ident) => {
        impl $ty {
            pub fn new(status: StatusCode, uri: impl Into<String>, body: impl Into<String>) -> Self {
                Self {
                    status,
                    uri: uri.into(),
                    body: body.into(),
                }
            }

            pub fn status(&self) -> StatusCode {
                self.status
            }

            /// Target URI of the failed request
            pub fn uri(&self) -> &str {
                &self.uri
            }

            /// Response body as text
            pub fn body(&self) -> &str {
                &self.body
            }
        }

        impl HttpStatusCodeError for $ty {
            fn raw_status_code(&self) -> u16 {
                self.status.as_u16()
            }
        }
    };
}

status_error_impl!(HttpClientError);
status_error_impl!(HttpServerError);

/// Simulated identity construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// An identity needs at least one principal record
    #[error("a simulated identity requires at least one principal record")]
    Empty,
}

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// JWT client errors
#[derive(Error, Debug)]
pub enum RestClientError {
    /// Signing secret is missing
    #[error("JWT signing secret is required")]
    MissingSecret,

    /// The request URI could not be parsed
    #[error("invalid request URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        source: url::ParseError,
    },

    /// Token could not be signed or verified
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Token carried an unusable identity
    #[error("invalid identity in token: {0}")]
    Identity(#[from] IdentityError),

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out
    #[error("request to {0} timed out")]
    Timeout(String),

    /// Body could not be serialized or deserialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 4xx response
    #[error("{0}")]
    ClientStatus(#[from] HttpClientError),

    /// 5xx or other non-success response
    #[error("{0}")]
    ServerStatus(#[from] HttpServerError),
}

impl RestClientError {
    /// Status code reported by the service, if the failure was an HTTP status
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ClientStatus(e) => Some(e.status()),
            Self::ServerStatus(e) => Some(e.status()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type RestClientResult<T> = Result<T, RestClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_client_error_message() {
        let err = HttpClientError::new(StatusCode::FORBIDDEN, "https://localhost:8443/a", "denied");
        assert_eq!(err.raw_status_code(), 403);
        assert_eq!(err.to_string(), "403 Forbidden from https://localhost:8443/a: denied");
    }

    #[test]
    fn test_status_variants_expose_source() {
        let err: RestClientError =
            HttpServerError::new(StatusCode::BAD_GATEWAY, "https://localhost/x", "").into();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));

        let source = err.source().unwrap();
        let inner = source.downcast_ref::<HttpServerError>().unwrap();
        assert_eq!(inner.raw_status_code(), 502);
    }

    #[test]
    fn test_non_status_errors_have_no_status() {
        assert_eq!(RestClientError::MissingSecret.status(), None);
        assert_eq!(RestClientError::Timeout("https://x".into()).status(), None);
    }
}
