//! CSP nonce middleware.
//!
//! Every request gets a fresh 128-bit nonce. Pages put it on their one inline
//! script (toast dismissal) and `security_headers_middleware` allows exactly
//! that nonce in `script-src`.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// A CSP nonce value for inline scripts.
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a new random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Get the nonce value for use in templates and headers.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Store a fresh nonce in the request extensions and echo it into the
/// response extensions, where the security headers layer picks it up.
///
/// Must run inside `security_headers_middleware`.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    let nonce = CspNonce::generate();
    request.extensions_mut().insert(nonce.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(nonce);
    response
}

/// Extract the request's nonce.
///
/// Falls back to an empty nonce (inline scripts then stay blocked) if the
/// middleware is not installed.
impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "CSP nonce not found in request extensions - middleware may be misconfigured"
            );
            Self(String::new())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_unique_base64() {
        let a = CspNonce::generate();
        let b = CspNonce::generate();
        assert_ne!(a.value(), b.value());
        // 16 bytes -> 24 base64 chars with padding
        assert_eq!(a.value().len(), 24);
        assert!(STANDARD.decode(a.value()).is_ok());
    }
}
