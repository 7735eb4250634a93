/*
 * Responsibility
 * - middleware public interface
 * - auth: access filter + role guard, http: cross-cutting transport layers
 */
pub mod auth;
pub mod http;
