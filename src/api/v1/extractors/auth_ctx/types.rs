/*
 * Responsibility
 * - the authenticated context handlers and role guards see
 * - the access middleware builds it and stores it in request extensions
 *
 * Notes
 * - organizations count as roles for `is_in_role`
 * - the role set is computed once; the context is immutable afterwards
 */

use std::collections::BTreeSet;

use crate::services::auth::Principal;

pub const AUTHENTICATION_SCHEME: &str = "JWT";

/// Context attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    principal: Principal,
    secure: bool,
    roles: BTreeSet<String>,
}

impl AuthCtx {
    pub fn new(principal: Principal, secure: bool) -> Self {
        let roles = principal
            .roles()
            .iter()
            .chain(principal.organizations())
            .cloned()
            .collect();

        Self {
            principal,
            secure,
            roles,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Roles and organizations together.
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether the request arrived over a secure transport.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn authentication_scheme(&self) -> &'static str {
        AUTHENTICATION_SCHEME
    }
}
