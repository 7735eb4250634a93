use std::fmt;

use super::identity::IdentityBuilder;
use super::keystore::TrustedKey;
use super::verifier::TokenVerifier;

/// Process-wide authentication components, shared read-only across requests.
#[derive(Clone)]
pub struct AuthService {
    verifier: TokenVerifier,
    identity: IdentityBuilder,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("verifier", &self.verifier)
            .field("identity", &self.identity)
            .finish()
    }
}

impl AuthService {
    pub fn new(key: TrustedKey, identity: IdentityBuilder) -> Self {
        Self {
            verifier: TokenVerifier::new(key),
            identity,
        }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn identity(&self) -> &IdentityBuilder {
        &self.identity
    }
}
