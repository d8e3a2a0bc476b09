//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (record in span, Sentry scope and response)
//! 4. CSP nonce (generate per-request nonce for the inline toast script)
//! 5. Security headers (nonce-aware CSP, frame/sniff/referrer policies)

pub mod csp;
pub mod request_id;
pub mod security_headers;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
