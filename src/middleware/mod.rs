/*
 * Responsibility
 * - Router-level layers (cors, http, security_headers)
 */
pub mod cors;
pub mod http;
pub mod security_headers;
