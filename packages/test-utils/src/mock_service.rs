//! Mock secured service for testing authenticated requests
//!
//! Provides a [`MockSecureService`] that only answers requests carrying a
//! bearer token it can verify, optionally requiring a role on the caller's
//! primary principal.

use bastion_jwt_client::{decode_identity, ServiceUri, SimulatedIdentity};
use bastion_shared_config::JwtConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Mock secured service for testing authenticated requests
///
/// This struct wraps a [`wiremock::MockServer`]. Unlike a plain mock, every
/// route mounted through it checks the `Authorization` header: a missing or
/// unverifiable token gets `401`, a caller without the required role gets
/// `403`.
///
/// The server speaks plain HTTP, so requests are addressed with
/// [`uri_for`](Self::uri_for) rather than through an `EndpointConfig`.
///
/// # Example
///
/// ```rust,ignore
/// use bastion_test_utils::MockSecureService;
///
/// #[tokio::test]
/// async fn test_list_tables() {
///     let service = MockSecureService::start(JwtConfig::new(SECRET)).await;
///     service.mock_json_for_role("GET", "/admin/listTables", "Administrator", json!(["t1"])).await;
///
///     // Send requests to service.uri_for("/admin/listTables")
/// }
/// ```
pub struct MockSecureService {
    server: MockServer,
    config: JwtConfig,
}

impl MockSecureService {
    /// Start a mock service that verifies tokens signed with `config`
    pub async fn start(config: JwtConfig) -> Self {
        let server = MockServer::start().await;
        Self { server, config }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Target URI for `request_path` on this server
    pub fn uri_for(&self, request_path: &str) -> ServiceUri {
        let address = self.server.address();
        ServiceUri::new("http", address.ip().to_string(), Some(address.port()), request_path)
    }

    /// Requests received so far, if recording is enabled
    pub async fn received_requests(&self) -> Option<Vec<Request>> {
        self.server.received_requests().await
    }

    /// Mount a route answering `200` with `body` for any authenticated caller
    pub async fn mock_json(&self, http_method: &str, route: &str, body: Value) {
        self.mount(http_method, route, self.responder(None, Reply::Json(200, body)))
            .await;
    }

    /// Mount a route answering `200` with `body` for callers holding `role`
    pub async fn mock_json_for_role(&self, http_method: &str, route: &str, role: &str, body: Value) {
        self.mount(
            http_method,
            route,
            self.responder(Some(role), Reply::Json(200, body)),
        )
        .await;
    }

    /// Mount a route answering `status` with an error message for authenticated callers
    pub async fn mock_status(&self, http_method: &str, route: &str, status: u16, message: &str) {
        self.mount(
            http_method,
            route,
            self.responder(None, Reply::Json(status, json!({ "message": message }))),
        )
        .await;
    }

    /// Mount a `GET` route describing the caller's verified identity
    ///
    /// The body has `user`, `roles`, `auths` and `proxiedUsers` fields.
    pub async fn mock_whoami(&self, route: &str) {
        self.mount("GET", route, self.responder(None, Reply::WhoAmI))
            .await;
    }

    /// Mount a route echoing the request body back for authenticated callers
    pub async fn mock_echo(&self, http_method: &str, route: &str) {
        self.mount(http_method, route, self.responder(None, Reply::Echo))
            .await;
    }

    fn responder(&self, required_role: Option<&str>, reply: Reply) -> AuthorizingResponder {
        AuthorizingResponder {
            config: self.config.clone(),
            required_role: required_role.map(str::to_string),
            reply,
        }
    }

    async fn mount(&self, http_method: &str, route: &str, responder: AuthorizingResponder) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(responder)
            .mount(&self.server)
            .await;
    }
}

enum Reply {
    Json(u16, Value),
    WhoAmI,
    Echo,
}

struct AuthorizingResponder {
    config: JwtConfig,
    required_role: Option<String>,
    reply: Reply,
}

impl AuthorizingResponder {
    fn authenticate(&self, request: &Request) -> Option<SimulatedIdentity> {
        let token = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))?;
        decode_identity(token, &self.config).ok()
    }
}

impl Respond for AuthorizingResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(identity) = self.authenticate(request) else {
            return ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" }));
        };

        if let Some(role) = &self.required_role {
            if !identity.primary().has_role(role) {
                return ResponseTemplate::new(403).set_body_json(json!({
                    "message": format!("{} lacks role {}", identity.username(), role)
                }));
            }
        }

        match &self.reply {
            Reply::Json(status, body) => ResponseTemplate::new(*status).set_body_json(body),
            Reply::WhoAmI => ResponseTemplate::new(200).set_body_json(json!({
                "user": identity.username(),
                "roles": identity.roles(),
                "auths": identity.auths(),
                "proxiedUsers": identity.proxied_users().len(),
            })),
            Reply::Echo => ResponseTemplate::new(200)
                .set_body_raw(request.body.clone(), "application/json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_secure_service_starts() {
        let service = MockSecureService::start(JwtConfig::new("a-secret-that-is-long-enough-for-tests")).await;
        assert!(service.url().starts_with("http://"));

        let uri = service.uri_for("/status");
        assert_eq!(uri.scheme(), "http");
        assert_eq!(uri.to_string(), format!("{}/status", service.url()));
    }
}
