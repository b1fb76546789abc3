//! Caller-facing responses.
//!
//! Every terminal outcome becomes exactly one response here. Transport
//! causes never appear in a body.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::forwarding::ForwardOutcome;

pub const SERVICE_UNAVAILABLE_BODY: &str = "Service Unavailable";

impl IntoResponse for ForwardOutcome {
    fn into_response(self) -> Response {
        match self {
            ForwardOutcome::Success(upstream) => {
                let mut response = Response::new(Body::from(upstream.body));
                *response.status_mut() = upstream.status;
                *response.headers_mut() = upstream.headers;
                response
            }
            ForwardOutcome::TransportFailure(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, SERVICE_UNAVAILABLE_BODY).into_response()
            }
            ForwardOutcome::ServiceUnresolved { service } => (
                StatusCode::NOT_FOUND,
                format!("Service \"{service}\" not found."),
            )
                .into_response(),
            ForwardOutcome::QuotaExceeded { retry_after } => {
                let mut response = (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").into_response();
                // Whole seconds, rounded up.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                response
            }
        }
    }
}
