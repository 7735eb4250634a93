/*
 * Responsibility
 * - v1 URL layout
 * - /health is public; /me and /echo sit behind the access middleware
 * - the access middleware wraps the role guard, so it always runs first
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{echo::echo, health::health, me::me};
use crate::middleware::auth::{access, require_role};
use crate::state::AppState;

pub const ECHO_ROLE: &str = "USER";

pub fn routes(state: AppState) -> Router<AppState> {
    let role_bound = require_role(Router::new().route("/echo", get(echo)), ECHO_ROLE);

    let secured = Router::new().route("/me", get(me)).merge(role_bound);
    let secured = access::apply(secured, state);

    Router::new().route("/health", get(health)).merge(secured)
}
