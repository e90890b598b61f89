//! JWT-authenticated HTTP client for Bastion
//!
//! This crate provides the two collaborators the test helpers are built on:
//! - A simulated identity model ([`SimulatedIdentity`], [`PrincipalRecord`])
//! - A client ([`JwtRestClient`]) that describes requests as
//!   [`RequestEntity`] values and sends them with a bearer token signed for
//!   the request's identity
//!
//! # Example
//!
//! ```rust,no_run
//! use bastion_jwt_client::{
//!     default_user_dn, JwtRestClient, Method, PrincipalRecord, ServiceUri, SimulatedIdentity,
//!     UserType,
//! };
//! use bastion_shared_config::JwtConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = JwtRestClient::new(JwtConfig::from_env()?)?;
//! let identity = SimulatedIdentity::single(PrincipalRecord::new(
//!     default_user_dn(),
//!     UserType::User,
//!     ["PUBLIC"],
//!     ["AuthorizedUser"],
//!     0,
//! ));
//!
//! let uri = ServiceUri::new("https", "localhost", Some(8443), "/v1/tables");
//! let request = client.create_request_entity::<()>(&identity, None, None, Method::GET, uri);
//! let response = client.exchange::<serde_json::Value, _>(&request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: token signing secret (required by `JwtConfig::from_env`)

mod client;
mod error;
mod identity;
mod request;
mod token;

pub use client::JwtRestClient;
pub use error::{
    HttpClientError, HttpServerError, HttpStatusCodeError, IdentityError, IdentityResult,
    RestClientError, RestClientResult,
};
pub use identity::{
    default_user_dn, PrincipalRecord, SimulatedIdentity, SubjectIssuerDnPair, UserType,
    DEFAULT_USER_ISSUER_DN, DEFAULT_USER_SUBJECT_DN,
};
pub use request::{RequestEntity, ResponseEntity, ServiceUri};
pub use token::{decode_identity, encode_identity};

pub use reqwest::{header, Method, StatusCode};
