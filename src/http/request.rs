//! Inbound request capture.
//!
//! # Responsibilities
//! - Generate a request ID as early as possible for tracing
//! - Capture the inbound request as an immutable `RouteRequest`
//! - Recover the remaining path exactly as the client sent it

use std::net::IpAddr;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, Method, Uri};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns a UUID `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request ID of an inbound request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// An inbound request addressed to a logical service.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    pub service: String,
    /// Path after `/api/{service}/`, still percent-encoded.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub client_ip: IpAddr,
}

impl RouteRequest {
    /// Build from the pieces axum extracted. `service` is the decoded path
    /// parameter; the remaining path is taken from the raw URI. IPv4-mapped
    /// peers from a dual-stack listener are stored as plain IPv4.
    pub fn from_parts(
        method: Method,
        service: String,
        uri: &Uri,
        headers: HeaderMap,
        body: Bytes,
        client_ip: IpAddr,
    ) -> Self {
        Self {
            method,
            service,
            path: remaining_path(uri.path()).to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
            client_ip: client_ip.to_canonical(),
        }
    }
}

/// Everything after the second segment of `/api/{service}/...`.
pub fn remaining_path(raw: &str) -> &str {
    raw.trim_start_matches('/')
        .splitn(3, '/')
        .nth(2)
        .unwrap_or("")
}
