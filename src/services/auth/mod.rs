pub mod bearer;
pub mod factory;
pub mod identity;
pub mod keystore;
pub mod service;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use bearer::extract_bearer;
pub use factory::build_auth_service;
pub use identity::{IdentityBuilder, Principal};
pub use service::AuthService;
pub use verifier::{TokenClaims, TokenVerifier, VerifyError};
