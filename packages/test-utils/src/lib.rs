//! Helpers for authenticated REST API integration tests
//!
//! This crate removes the boilerplate from tests against a secured service:
//! building requests signed for a simulated caller, asserting on status
//! codes, and asserting on the kind and message of expected failures.
//!
//! # Helpers
//!
//! - [`TestHelper`] - Builds authenticated GET/POST/PUT requests and asserts `200 OK`
//! - [`simulated_identity`] / [`simulated_identity_with_dn`] - Build caller identities
//! - [`assert_http_status_error`] / [`assert_error_message_contains`] - Assert on failures
//! - [`MockSecureService`] - Mock service that verifies bearer tokens and roles
//!
//! # Example
//!
//! ```rust,ignore
//! use bastion_test_utils::{simulated_identity, TestHelper};
//!
//! #[tokio::test]
//! async fn test_list_tables() {
//!     let helper = TestHelper::from_env(simulated_identity(["Administrator"], ["PUBLIC"])).unwrap();
//!
//!     let request = helper.create_get_request("/admin/listTables");
//!     let tables: Vec<String> = helper.assert_status_200(&request).await.unwrap();
//!     assert!(!tables.is_empty());
//! }
//! ```

mod assertions;
mod helper;
mod identity;
mod mock_service;
mod logging;

pub use assertions::{
    assert_error_message_contains, assert_error_message_contains_async, assert_http_status_error,
    assert_http_status_error_async,
};
pub use helper::TestHelper;
pub use identity::{simulated_identity, simulated_identity_with_dn};
pub use mock_service::MockSecureService;
pub use logging::init_tracing;

pub use bastion_jwt_client::{default_user_dn, SimulatedIdentity, SubjectIssuerDnPair};
