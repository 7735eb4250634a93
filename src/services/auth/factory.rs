/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::identity::{ClaimRoleMapper, IdentityBuilder, NoRoleMapper, RoleMapper};
use crate::services::auth::keystore::{
    BundledResources, KeyStoreError, ResourceLookup, load_public_key,
};
use crate::services::auth::AuthService;

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, KeyStoreError> {
    build_auth_service_with(config, &BundledResources)
}

/// Same as [`build_auth_service`], with an explicit source for bundled key-stores.
pub fn build_auth_service_with(
    config: &Config,
    resources: &dyn ResourceLookup,
) -> Result<Arc<AuthService>, KeyStoreError> {
    let key = load_public_key(
        &config.keystore.location,
        &config.keystore.password,
        &config.keystore.alias,
        resources,
    )?;

    let role_mapper: Arc<dyn RoleMapper> =
        match (&config.roles_claim, &config.organizations_claim) {
            (None, None) => Arc::new(NoRoleMapper),
            (roles, organizations) => {
                tracing::info!(
                    roles_claim = roles.as_deref(),
                    organizations_claim = organizations.as_deref(),
                    "deriving roles from token claims"
                );
                Arc::new(ClaimRoleMapper::new(roles.clone(), organizations.clone()))
            }
        };

    Ok(Arc::new(AuthService::new(
        key,
        IdentityBuilder::new(role_mapper),
    )))
}
