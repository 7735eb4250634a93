/*
 * Responsibility
 * - extractors shared by v1 handlers (re-export)
 */
pub mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
