//! Cross-origin policy for the API.
//!
//! The API holds the user's completion key, so only the page it serves (same
//! origin) and at most one configured origin may call it. CORS alone only
//! hides responses; multipart POSTs skip the preflight, so requests from any
//! other origin are refused before they reach a handler.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::errors::AppError;

/// CORS headers for the configured origin. With no origin configured the
/// layer never emits `access-control-allow-origin`.
pub fn cors_layer(allowed_origin: Option<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);
    match allowed_origin {
        Some(origin) => layer.allow_origin(origin),
        None => layer,
    }
}

/// Rejects requests whose `Origin` is neither this server nor the configured
/// origin. Requests without an `Origin` header (curl, same-origin GETs) pass.
pub async fn reject_foreign_origin(
    State(allowed_origin): State<Option<HeaderValue>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = allowed_origin.as_ref() == Some(origin)
            || is_same_origin(origin, request.headers());
        if !allowed {
            warn!(
                "Refused {} {} from origin {:?}",
                request.method(),
                request.uri().path(),
                origin
            );
            return Err(AppError::Forbidden(
                "Requests from this origin are not allowed".to_string(),
            ));
        }
    }
    Ok(next.run(request).await)
}

/// `Origin` is `scheme://host[:port]`; it matches when the authority equals
/// the `Host` the request was sent to.
fn is_same_origin(origin: &HeaderValue, headers: &HeaderMap) -> bool {
    let (Ok(origin), Some(Ok(host))) = (
        origin.to_str(),
        headers.get(header::HOST).map(HeaderValue::to_str),
    ) else {
        return false;
    };
    origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .is_some_and(|authority| authority.eq_ignore_ascii_case(host))
}
