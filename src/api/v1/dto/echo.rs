/*
 * Responsibility
 * - query string of GET /echo
 */
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct EchoQuery {
    pub message: Option<String>,
}
