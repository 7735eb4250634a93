//! Caller identity derived from verified token claims.
//!
//! Roles and organizations are produced by a [`RoleMapper`]. The default
//! mapper derives none; [`ClaimRoleMapper`] reads them from configured claims.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::verifier::TokenClaims;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("token has no subject")]
    MissingSubject,

    #[error("claim {claim} must be {expected}")]
    WrongType {
        claim: String,
        expected: &'static str,
    },
}

/// Authenticated caller. Built per request, never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    name: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    roles: BTreeSet<String>,
    organizations: BTreeSet<String>,
}

impl Principal {
    /// Token subject.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn organizations(&self) -> &BTreeSet<String> {
        &self.organizations
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("name", &"[REDACTED]")
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("roles", &self.roles)
            .field("organizations", &self.organizations)
            .finish()
    }
}

/// Strategy for deriving roles and organizations from claims.
pub trait RoleMapper: Send + Sync + fmt::Debug {
    fn roles(&self, claims: &TokenClaims) -> Result<BTreeSet<String>, IdentityError>;

    fn organizations(&self, claims: &TokenClaims) -> Result<BTreeSet<String>, IdentityError>;
}

/// Derives no roles and no organizations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRoleMapper;

impl RoleMapper for NoRoleMapper {
    fn roles(&self, _claims: &TokenClaims) -> Result<BTreeSet<String>, IdentityError> {
        Ok(BTreeSet::new())
    }

    fn organizations(&self, _claims: &TokenClaims) -> Result<BTreeSet<String>, IdentityError> {
        Ok(BTreeSet::new())
    }
}

/// Reads roles and organizations from claims named by dot-separated paths
/// (e.g. `realm_access.roles`).
///
/// A claim may hold an array of strings or one space-separated string.
/// An unset path or an absent claim gives an empty set.
#[derive(Debug, Default, Clone)]
pub struct ClaimRoleMapper {
    roles_claim: Option<String>,
    organizations_claim: Option<String>,
}

impl ClaimRoleMapper {
    pub fn new(roles_claim: Option<String>, organizations_claim: Option<String>) -> Self {
        Self {
            roles_claim,
            organizations_claim,
        }
    }
}

impl RoleMapper for ClaimRoleMapper {
    fn roles(&self, claims: &TokenClaims) -> Result<BTreeSet<String>, IdentityError> {
        string_set(claims, self.roles_claim.as_deref())
    }

    fn organizations(&self, claims: &TokenClaims) -> Result<BTreeSet<String>, IdentityError> {
        string_set(claims, self.organizations_claim.as_deref())
    }
}

fn string_set(claims: &TokenClaims, path: Option<&str>) -> Result<BTreeSet<String>, IdentityError> {
    let Some(path) = path else {
        return Ok(BTreeSet::new());
    };

    let wrong_type = || IdentityError::WrongType {
        claim: path.to_string(),
        expected: "an array of strings or a space-separated string",
    };

    match claims.claim_path(path) {
        None | Some(Value::Null) => Ok(BTreeSet::new()),
        Some(Value::String(s)) => Ok(s.split_whitespace().map(str::to_string).collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong_type))
            .collect(),
        Some(_) => Err(wrong_type()),
    }
}

fn optional_string(claims: &TokenClaims, name: &str) -> Result<Option<String>, IdentityError> {
    match claims.claim(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(IdentityError::WrongType {
            claim: name.to_string(),
            expected: "a string",
        }),
    }
}

/// Turns verified claims into a [`Principal`].
#[derive(Debug, Clone)]
pub struct IdentityBuilder {
    role_mapper: Arc<dyn RoleMapper>,
}

impl Default for IdentityBuilder {
    fn default() -> Self {
        Self::new(Arc::new(NoRoleMapper))
    }
}

impl IdentityBuilder {
    pub fn new(role_mapper: Arc<dyn RoleMapper>) -> Self {
        Self { role_mapper }
    }

    /// Build the caller identity, or `None` when the claims cannot describe one.
    ///
    /// Failures are logged at error level.
    pub fn build(&self, claims: &TokenClaims) -> Option<Principal> {
        match self.try_build(claims) {
            Ok(principal) => Some(principal),
            Err(err) => {
                tracing::error!(error = %err, "unable to extract principal from token claims");
                None
            }
        }
    }

    pub fn try_build(&self, claims: &TokenClaims) -> Result<Principal, IdentityError> {
        let name = claims
            .subject()
            .filter(|sub| !sub.is_empty())
            .ok_or(IdentityError::MissingSubject)?
            .to_string();

        Ok(Principal {
            name,
            email: optional_string(claims, "email")?,
            first_name: optional_string(claims, "given_name")?,
            last_name: optional_string(claims, "family_name")?,
            roles: self.role_mapper.roles(claims)?,
            organizations: self.role_mapper.organizations(claims)?,
        })
    }
}
