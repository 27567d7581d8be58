/*
 * Responsibility
 * - Public interface of the middleware layer (re-export)
 * - Pipeline stages: validate (input) -> auth (session cookie)
 * - Transport concerns: cors, http (request id / trace / deadline), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
pub mod validate;
