//! Simulated identity builders

use bastion_jwt_client::{default_user_dn, PrincipalRecord, SimulatedIdentity, SubjectIssuerDnPair, UserType};
use chrono::Utc;

/// Build a `USER` identity with the default DN pair
///
/// The identity has a single principal record holding `roles` and `auths`,
/// created now.
pub fn simulated_identity<R, A>(roles: R, auths: A) -> SimulatedIdentity
where
    R: IntoIterator,
    R::Item: Into<String>,
    A: IntoIterator,
    A::Item: Into<String>,
{
    simulated_identity_with_dn(default_user_dn(), roles, auths)
}

/// Build a `USER` identity for a specific DN pair
pub fn simulated_identity_with_dn<R, A>(dn: SubjectIssuerDnPair, roles: R, auths: A) -> SimulatedIdentity
where
    R: IntoIterator,
    R::Item: Into<String>,
    A: IntoIterator,
    A::Item: Into<String>,
{
    let record = PrincipalRecord::new(
        dn,
        UserType::User,
        auths,
        roles,
        Utc::now().timestamp_millis(),
    );
    SimulatedIdentity::single(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_simulated_identity_single_record() {
        let identity = simulated_identity(["A"], ["X"]);

        assert_eq!(identity.proxied_users().len(), 1);
        let record = identity.primary();
        assert_eq!(record.roles(), &set(&["A"]));
        assert_eq!(record.auths(), &set(&["X"]));
        assert_eq!(record.user_type(), UserType::User);
        assert_eq!(identity.creation_time(), record.creation_time());
        assert_eq!(record.dn(), &default_user_dn());
    }

    #[test]
    fn test_simulated_identity_with_dn() {
        let dn = SubjectIssuerDnPair::new("CN=Alice", "CN=Test CA");
        let identity = simulated_identity_with_dn(dn.clone(), Vec::<String>::new(), ["PUBLIC"]);

        assert_eq!(identity.primary().dn(), &dn);
        assert!(identity.roles().is_empty());
        assert_eq!(identity.auths(), &set(&["PUBLIC"]));
    }

    #[test]
    fn test_creation_time_is_recent() {
        let before = Utc::now().timestamp_millis();
        let identity = simulated_identity(["A"], ["X"]);
        let after = Utc::now().timestamp_millis();

        assert!(identity.creation_time() >= before);
        assert!(identity.creation_time() <= after);
    }
}
