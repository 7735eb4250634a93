/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - Clone is cheap (Arc inside); auth is built once before the listener binds
 */
use std::sync::Arc;

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}
