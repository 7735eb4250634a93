/*
 * Responsibility
 * - GET /echo?message=... (requires role USER)
 * - returns the message as text/plain
 */
use axum::extract::Query;

use crate::api::v1::dto::echo::EchoQuery;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn echo(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<EchoQuery>,
) -> String {
    tracing::debug!(roles = ?ctx.roles(), "echo");
    query.message.unwrap_or_default()
}
