//! Bearer-token authentication filter for an axum service.
//!
//! Every secured route runs the access middleware: the `Authorization` header is
//! parsed, the JWT is verified against one RSA key loaded from a PKCS#12
//! key-store at startup, and the resulting [`AuthCtx`](api::v1::extractors::AuthCtx)
//! is published to the request for handlers and role guards.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
