//! Security headers middleware.
//!
//! Adds restrictive headers to every response. The CSP allows scripts from
//! `'self'` (the configurator script) plus the per-request nonce stamped by
//! [`csp_nonce_middleware`](super::csp_nonce_middleware).

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::CspNonce;

/// Build the Content-Security-Policy for a response.
///
/// ```text
/// default-src 'none';
/// script-src 'self' 'nonce-…';
/// style-src 'self';
/// img-src 'self';
/// connect-src 'self';
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none'
/// ```
#[must_use]
pub fn content_security_policy(nonce: Option<&str>) -> String {
    let script_src = match nonce {
        Some(nonce) if !nonce.is_empty() => format!("script-src 'self' 'nonce-{nonce}'"),
        _ => "script-src 'self'".to_string(),
    };

    [
        "default-src 'none'",
        &script_src,
        "style-src 'self'",
        "img-src 'self'",
        "connect-src 'self'",
        "object-src 'none'",
        "base-uri 'self'",
        "form-action 'self'",
        "frame-ancestors 'none'",
    ]
    .join("; ")
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy` - see [`content_security_policy`]
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Permissions-Policy` - Deny sensitive features
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let csp = content_security_policy(
        response
            .extensions()
            .get::<CspNonce>()
            .map(CspNonce::value),
    );

    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&csp) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), \
             geolocation=(), \
             microphone=(), \
             payment=(), \
             usb=()",
        ),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}
