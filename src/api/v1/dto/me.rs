/*
 * Responsibility
 * - response DTO of GET /me (the authenticated caller as the filter sees it)
 */
use std::collections::BTreeSet;

use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub name: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: BTreeSet<String>,
    pub organizations: BTreeSet<String>,
    pub secure: bool,
    pub authentication_scheme: &'static str,
}

impl From<&AuthCtx> for MeResponse {
    fn from(ctx: &AuthCtx) -> Self {
        let principal = ctx.principal();
        Self {
            name: principal.name().to_string(),
            email: principal.email().map(str::to_string),
            first_name: principal.first_name().map(str::to_string),
            last_name: principal.last_name().map(str::to_string),
            roles: principal.roles().clone(),
            organizations: principal.organizations().clone(),
            secure: ctx.is_secure(),
            authentication_scheme: ctx.authentication_scheme(),
        }
    }
}
