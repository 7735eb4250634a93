//! Access token (JWT) verification, then `AuthCtx` into request extensions.
//!
//! Only routes wrapped with [`apply`] are filtered. Every rejection is the same
//! 401 to the client; the reason is only logged.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header, uri::Scheme},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::http::SecureTransport;
use crate::services::auth::{AuthService, VerifyError, extract_bearer};
use crate::state::AppState;

/// Why a request was not authenticated.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("no Authorization header")]
    MissingHeader,

    #[error("Authorization header does not carry a Bearer credential")]
    MissingCredential,

    #[error(transparent)]
    Token(#[from] VerifyError),

    #[error("no caller identity in token claims")]
    NoIdentity,
}

/// Attach the access middleware to every route of `router`.
///
/// Uses `route_layer`, so unmatched paths still 404 rather than 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Run the filter for one request.
///
/// `secure` is the transport flag for the context, `now` is seconds since the
/// Unix epoch.
pub fn authorize(
    auth: &AuthService,
    header: Option<&HeaderValue>,
    secure: bool,
    now: i64,
) -> Result<AuthCtx, Rejection> {
    let header = header.ok_or(Rejection::MissingHeader)?;

    let credential = header
        .to_str()
        .ok()
        .and_then(extract_bearer)
        .ok_or(Rejection::MissingCredential)?;

    let claims = auth.verifier().verify(credential, now)?;

    let principal = auth
        .identity()
        .build(&claims)
        .ok_or(Rejection::NoIdentity)?;

    Ok(AuthCtx::new(principal, secure))
}

pub async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let secure = req.extensions().get::<SecureTransport>().is_some()
        || req.uri().scheme() == Some(&Scheme::HTTPS);
    let now = chrono::Utc::now().timestamp();

    let auth_ctx = match authorize(
        &state.auth,
        req.headers().get(header::AUTHORIZATION),
        secure,
        now,
    ) {
        Ok(ctx) => ctx,
        Err(rejection) => {
            log_rejection(&rejection);
            return Err(AppError::Unauthorized);
        }
    };

    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

fn log_rejection(rejection: &Rejection) {
    match rejection {
        Rejection::MissingHeader | Rejection::MissingCredential => {
            tracing::debug!(reason = %rejection, "request not authenticated");
        }
        Rejection::Token(err) => {
            tracing::warn!(error = %err, "access token verification failed");
        }
        // Already logged with its cause by the identity builder.
        Rejection::NoIdentity => {
            tracing::error!(reason = %rejection, "request not authenticated");
        }
    }
}
