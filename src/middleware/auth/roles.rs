//! Route-level role requirement, checked after the access middleware.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct RequiredRole(pub &'static str);

/// Allow only callers whose context is in `role` on every route of `router`.
///
/// Must sit inside the access middleware: no context gives 401, a context
/// without the role gives 403.
pub fn require_role(router: Router<AppState>, role: &'static str) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(RequiredRole(role), role_guard))
}

async fn role_guard(
    State(RequiredRole(role)): State<RequiredRole>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthCtx>()
        .ok_or(AppError::Unauthorized)?;

    if !ctx.is_in_role(role) {
        tracing::warn!(role, "caller lacks required role");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
