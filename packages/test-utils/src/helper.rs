//! Authenticated request builder for REST API tests

use bastion_jwt_client::{
    JwtRestClient, Method, RequestEntity, RestClientError, RestClientResult, ServiceUri,
    SimulatedIdentity, StatusCode,
};
use bastion_shared_config::{load_dotenv, EndpointConfig, JwtConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Builds authenticated requests against the service under test
///
/// Every request is addressed to `https://<host>:<port><base_path><path>` and
/// signed for either the default identity or one supplied per call. The
/// helper holds no mutable state and can be shared across tests.
#[derive(Debug, Clone)]
pub struct TestHelper {
    client: JwtRestClient,
    default_identity: SimulatedIdentity,
    endpoint: EndpointConfig,
}

impl TestHelper {
    /// Create a helper for a service on `localhost:<port>` under `base_path`
    pub fn new(
        client: JwtRestClient,
        default_identity: SimulatedIdentity,
        port: u16,
        base_path: impl Into<String>,
    ) -> Self {
        Self::from_config(client, default_identity, EndpointConfig::new(port, base_path))
    }

    pub fn from_config(
        client: JwtRestClient,
        default_identity: SimulatedIdentity,
        endpoint: EndpointConfig,
    ) -> Self {
        Self {
            client,
            default_identity,
            endpoint,
        }
    }

    /// Create a helper from `SERVICE_*` and `JWT_*` environment variables
    ///
    /// A `.env` file is loaded first if present.
    pub fn from_env(default_identity: SimulatedIdentity) -> anyhow::Result<Self> {
        load_dotenv();
        let endpoint = EndpointConfig::from_env()?;
        let client = JwtRestClient::new(JwtConfig::from_env()?)?;
        Ok(Self::from_config(client, default_identity, endpoint))
    }

    pub fn client(&self) -> &JwtRestClient {
        &self.client
    }

    pub fn default_identity(&self) -> &SimulatedIdentity {
        &self.default_identity
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Target URI for `path`, relative to the configured base path
    ///
    /// `path` is not validated.
    pub fn build_uri(&self, path: &str) -> ServiceUri {
        ServiceUri::new(
            self.endpoint.scheme(),
            self.endpoint.host(),
            Some(self.endpoint.port()),
            format!("{}{}", self.endpoint.base_path(), path),
        )
    }

    pub fn create_get_request(&self, path: &str) -> RequestEntity<()> {
        self.create_get_request_as(&self.default_identity, path)
    }

    pub fn create_get_request_as(&self, identity: &SimulatedIdentity, path: &str) -> RequestEntity<()> {
        self.create_request(identity, path, None, Method::GET)
    }

    pub fn create_post_request<B>(&self, path: &str, body: B) -> RequestEntity<B> {
        self.create_post_request_as(&self.default_identity, path, body)
    }

    pub fn create_post_request_as<B>(
        &self,
        identity: &SimulatedIdentity,
        path: &str,
        body: B,
    ) -> RequestEntity<B> {
        self.create_request(identity, path, Some(body), Method::POST)
    }

    pub fn create_put_request<B>(&self, path: &str, body: B) -> RequestEntity<B> {
        self.create_put_request_as(&self.default_identity, path, body)
    }

    pub fn create_put_request_as<B>(
        &self,
        identity: &SimulatedIdentity,
        path: &str,
        body: B,
    ) -> RequestEntity<B> {
        self.create_request(identity, path, Some(body), Method::PUT)
    }

    /// Shared primitive behind the `create_*_request` methods
    pub fn create_request<B>(
        &self,
        identity: &SimulatedIdentity,
        path: &str,
        body: Option<B>,
        method: Method,
    ) -> RequestEntity<B> {
        self.client
            .create_request_entity(identity, body, None, method, self.build_uri(path))
    }

    /// Send `request` and return its decoded body, failing the test unless the status is 200
    ///
    /// # Panics
    /// If the service answers with any status other than `200 OK`. The panic
    /// message names the target URI.
    ///
    /// # Errors
    /// Failures that produce no status (invalid URI, token signing, transport,
    /// body decoding) are returned to the caller.
    pub async fn assert_status_200<T, B>(&self, request: &RequestEntity<B>) -> RestClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let uri = request.uri().to_string();
        let response = match self.client.exchange_bytes(request).await {
            Ok(response) => response,
            Err(RestClientError::ClientStatus(e)) => {
                panic!("Request to '{}' did not return 200 status: got {}", uri, e.status())
            }
            Err(RestClientError::ServerStatus(e)) => {
                panic!("Request to '{}' did not return 200 status: got {}", uri, e.status())
            }
            Err(e) => return Err(e),
        };

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Request to '{}' did not return 200 status",
            uri
        );
        debug!(uri = %uri, "Request returned 200");

        Ok(response.decode()?.into_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated_identity;

    const SECRET: &str = "test-jwt-secret-for-integration-tests-minimum-32-chars";

    fn helper() -> TestHelper {
        let client = JwtRestClient::new(JwtConfig::new(SECRET)).unwrap();
        TestHelper::new(client, simulated_identity(["Administrator"], ["PUBLIC"]), 8443, "/accumulo/v1")
    }

    #[test]
    fn test_build_uri_appends_path_to_base() {
        let uri = helper().build_uri("/admin/listTables");
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.host(), "localhost");
        assert_eq!(uri.port(), Some(8443));
        assert_eq!(uri.path(), "/accumulo/v1/admin/listTables");
        assert_eq!(uri.to_string(), "https://localhost:8443/accumulo/v1/admin/listTables");
    }

    #[test]
    fn test_build_uri_does_not_validate() {
        let uri = helper().build_uri("/lookup/bad table?x=[");
        assert_eq!(uri.path(), "/accumulo/v1/lookup/bad table?x=[");
    }

    #[test]
    fn test_get_uses_default_identity() {
        let helper = helper();
        let request = helper.create_get_request("/admin/listUsers");
        assert_eq!(request.identity(), helper.default_identity());
        assert_eq!(request.method(), &Method::GET);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_get_as_uses_given_identity() {
        let helper = helper();
        let other = simulated_identity(["AuthorizedUser"], ["PRIVATE"]);
        let request = helper.create_get_request_as(&other, "/admin/listUsers");
        assert_eq!(request.identity(), &other);
        assert_ne!(request.identity(), helper.default_identity());
    }

    #[test]
    fn test_post_and_put_carry_body() {
        let helper = helper();

        let post = helper.create_post_request("/admin/createTable/t1", "props");
        assert_eq!(post.method(), &Method::POST);
        assert_eq!(post.body(), Some(&"props"));
        assert_eq!(post.identity(), helper.default_identity());

        let put = helper.create_put_request("/admin/setTableProperty", 7);
        assert_eq!(put.method(), &Method::PUT);
        assert_eq!(put.body(), Some(&7));
        assert_eq!(put.uri().path(), "/accumulo/v1/admin/setTableProperty");
    }
}
