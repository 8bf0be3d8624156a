use axum::http::{header::CACHE_CONTROL, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// Sampled decks and content lists must never be served from a cache.
pub fn no_store() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(CACHE_CONTROL, HeaderValue::from_static("no-store"))
}
