//! JWT claims carrying a simulated identity

use bastion_shared_config::JwtConfig;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RestClientResult;
use crate::identity::{PrincipalRecord, SimulatedIdentity};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IdentityClaims {
    /// Subject (primary subject DN)
    pub sub: String,

    /// Every principal record, primary first
    pub users: Vec<PrincipalRecord>,

    /// Identity creation time (Unix epoch millis)
    pub created: i64,

    /// Unique token ID
    pub jti: Uuid,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,

    pub iss: String,
    pub aud: String,
}

impl IdentityClaims {
    pub fn new(identity: &SimulatedIdentity, config: &JwtConfig) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: identity.username().to_string(),
            users: identity.proxied_users().to_vec(),
            created: identity.creation_time(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + config.token_ttl_secs,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
        }
    }

    pub fn into_identity(self) -> RestClientResult<SimulatedIdentity> {
        Ok(SimulatedIdentity::new(self.users, self.created)?)
    }
}

/// Sign a token for `identity`
pub fn encode_identity(identity: &SimulatedIdentity, config: &JwtConfig) -> RestClientResult<String> {
    let claims = IdentityClaims::new(identity, config);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a token and rebuild the identity it carries
///
/// # Errors
/// - `RestClientError::Token` if the signature, issuer, audience or expiry is invalid
/// - `RestClientError::Identity` if the token carries no principal records
pub fn decode_identity(token: &str, config: &JwtConfig) -> RestClientResult<SimulatedIdentity> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    let token_data = decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        e
    })?;

    token_data.claims.into_identity()
}
