//! JWT-authenticated HTTP client

use std::fmt;
use std::time::Duration;

use bastion_shared_config::JwtConfig;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{HttpClientError, HttpServerError, RestClientError, RestClientResult};
use crate::identity::SimulatedIdentity;
use crate::request::{RequestEntity, ResponseEntity, ServiceUri};
use crate::token;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP client that signs every request with a JWT for the request's identity
///
/// Each call to [`exchange`](Self::exchange) sends exactly one request; there
/// is no retry.
#[derive(Clone)]
pub struct JwtRestClient {
    http_client: Client,
    config: JwtConfig,
}

impl fmt::Debug for JwtRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtRestClient")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish()
    }
}

impl JwtRestClient {
    /// Create a new client with the given signing configuration
    ///
    /// # Errors
    /// - `RestClientError::MissingSecret` if the secret is empty
    /// - `RestClientError::Http` if the underlying client cannot be built
    pub fn new(config: JwtConfig) -> RestClientResult<Self> {
        if config.secret.is_empty() {
            return Err(RestClientError::MissingSecret);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .user_agent("Bastion/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Describe a request; nothing is sent
    pub fn create_request_entity<B>(
        &self,
        identity: &SimulatedIdentity,
        body: Option<B>,
        headers: Option<HeaderMap>,
        method: Method,
        uri: ServiceUri,
    ) -> RequestEntity<B> {
        RequestEntity::new(
            identity.clone(),
            body,
            headers.unwrap_or_default(),
            method,
            uri,
        )
    }

    /// Sign a bearer token for `identity`
    pub fn create_token(&self, identity: &SimulatedIdentity) -> RestClientResult<String> {
        token::encode_identity(identity, &self.config)
    }

    /// Verify a bearer token and rebuild its identity
    pub fn decode_token(&self, token: &str) -> RestClientResult<SimulatedIdentity> {
        token::decode_identity(token, &self.config)
    }

    /// Send the request and decode the response body as `T`
    ///
    /// # Errors
    /// - `RestClientError::ClientStatus` for 4xx responses
    /// - `RestClientError::ServerStatus` for 5xx and other non-success responses
    /// - `RestClientError::Json` if the body cannot be encoded or decoded
    /// - `RestClientError::InvalidUri`, `Token`, `Http`, `Timeout` for failures before a response arrives
    pub async fn exchange<T, B>(&self, request: &RequestEntity<B>) -> RestClientResult<ResponseEntity<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.exchange_bytes(request).await?.decode()
    }

    /// Send the request and return the raw body
    ///
    /// Non-success statuses are reported as errors exactly like [`exchange`](Self::exchange).
    #[instrument(skip(self, request), fields(method = %request.method(), uri = %request.uri()))]
    pub async fn exchange_bytes<B>(&self, request: &RequestEntity<B>) -> RestClientResult<ResponseEntity<Vec<u8>>>
    where
        B: Serialize,
    {
        let uri = request.uri().to_string();
        let url = request
            .uri()
            .to_url()
            .map_err(|source| RestClientError::InvalidUri {
                uri: uri.clone(),
                source,
            })?;

        let token = self.create_token(request.identity())?;

        let mut builder = self
            .http_client
            .request(request.method().clone(), url)
            .headers(request.headers().clone())
            .bearer_auth(token);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(user = %request.identity().username(), "Sending authenticated request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                RestClientError::Timeout(uri.clone())
            } else {
                RestClientError::Http(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?.to_vec();

        debug!(status = %status, body_len = bytes.len(), "Received response");

        if status.is_client_error() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(HttpClientError::new(status, uri, text).into());
        }
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(HttpServerError::new(status, uri, text).into());
        }

        Ok(ResponseEntity::new(status, headers, bytes))
    }
}
