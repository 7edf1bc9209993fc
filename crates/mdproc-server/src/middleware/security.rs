//! Security headers middleware.
//!
//! Every response carries `X-Content-Type-Options: nosniff` and
//! `X-Frame-Options: DENY`. Downloads are served as attachments, so browsers
//! must not sniff them into something renderable.

use axum::http::HeaderValue;
use axum::http::header::{HeaderName, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use tower_http::set_header::SetResponseHeaderLayer;

/// Create layer that adds X-Content-Type-Options header.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(X_CONTENT_TYPE_OPTIONS, "nosniff")
}

/// Create layer that adds X-Frame-Options header.
pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(X_FRAME_OPTIONS, "DENY")
}

fn overriding(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
