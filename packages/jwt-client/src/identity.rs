//! Simulated caller identities
//!
//! A [`SimulatedIdentity`] stands in for an authenticated caller in tests. It
//! holds one or more [`PrincipalRecord`]s: the first is the primary caller,
//! any others are the entities it is acting through (the proxy chain).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, IdentityResult};

/// Subject DN of the default test user
pub const DEFAULT_USER_SUBJECT_DN: &str = "userDn";

/// Issuer DN of the default test user
pub const DEFAULT_USER_ISSUER_DN: &str = "issuerDn";

/// Subject/issuer distinguished-name pair identifying a principal
///
/// Both DNs are trimmed and lower-cased on construction so pairs compare
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectIssuerDnPair {
    subject_dn: String,
    issuer_dn: String,
}

impl SubjectIssuerDnPair {
    pub fn new(subject_dn: impl AsRef<str>, issuer_dn: impl AsRef<str>) -> Self {
        Self {
            subject_dn: normalize_dn(subject_dn.as_ref()),
            issuer_dn: normalize_dn(issuer_dn.as_ref()),
        }
    }

    pub fn subject_dn(&self) -> &str {
        &self.subject_dn
    }

    pub fn issuer_dn(&self) -> &str {
        &self.issuer_dn
    }
}

impl fmt::Display for SubjectIssuerDnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.subject_dn, self.issuer_dn)
    }
}

fn normalize_dn(dn: &str) -> String {
    dn.trim().to_lowercase()
}

/// The DN pair used when a test does not supply one
pub fn default_user_dn() -> SubjectIssuerDnPair {
    SubjectIssuerDnPair::new(DEFAULT_USER_SUBJECT_DN, DEFAULT_USER_ISSUER_DN)
}

/// Kind of entity a principal record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// A human user
    #[default]
    User,
    /// A server acting on behalf of a user
    Server,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Server => write!(f, "SERVER"),
        }
    }
}

/// A single identity claim within a simulated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalRecord {
    dn: SubjectIssuerDnPair,
    user_type: UserType,
    auths: BTreeSet<String>,
    roles: BTreeSet<String>,
    /// Unix epoch milliseconds
    creation_time: i64,
}

impl PrincipalRecord {
    pub fn new<A, R>(
        dn: SubjectIssuerDnPair,
        user_type: UserType,
        auths: A,
        roles: R,
        creation_time: i64,
    ) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            dn,
            user_type,
            auths: auths.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
            creation_time,
        }
    }

    pub fn dn(&self) -> &SubjectIssuerDnPair {
        &self.dn
    }

    /// The subject DN, which doubles as the principal's name
    pub fn name(&self) -> &str {
        self.dn.subject_dn()
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn auths(&self) -> &BTreeSet<String> {
        &self.auths
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn creation_time(&self) -> i64 {
        self.creation_time
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Test-only stand-in for an authenticated caller
///
/// Always holds at least one principal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedIdentity {
    records: Vec<PrincipalRecord>,
    creation_time: i64,
}

impl SimulatedIdentity {
    /// Build an identity from an ordered proxy chain
    ///
    /// # Errors
    /// Returns `IdentityError::Empty` if `records` is empty
    pub fn new(records: Vec<PrincipalRecord>, creation_time: i64) -> IdentityResult<Self> {
        if records.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Self {
            records,
            creation_time,
        })
    }

    /// Identity made of one record, created at the record's creation time
    pub fn single(record: PrincipalRecord) -> Self {
        let creation_time = record.creation_time();
        Self {
            records: vec![record],
            creation_time,
        }
    }

    /// The record that determines who the caller is
    pub fn primary(&self) -> &PrincipalRecord {
        // non-empty by construction
        &self.records[0]
    }

    /// Every record, primary first
    pub fn proxied_users(&self) -> &[PrincipalRecord] {
        &self.records
    }

    pub fn username(&self) -> &str {
        self.primary().name()
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        self.primary().roles()
    }

    pub fn auths(&self) -> &BTreeSet<String> {
        self.primary().auths()
    }

    pub fn creation_time(&self) -> i64 {
        self.creation_time
    }
}
