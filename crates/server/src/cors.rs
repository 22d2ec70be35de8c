//! Origin allow-list enforcement.
//!
//! Browsers only honour CORS headers, so a disallowed origin would still
//! reach the handler (and spawn a summarizer) if headers were all we set.
//! The guard rejects such requests outright, preflights included; the
//! `CorsLayer` then decorates responses for allowed origins.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::error::{ApiError, ErrorCode};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub(crate) struct OriginPolicy {
    allowed: Arc<Vec<HeaderValue>>,
}

impl OriginPolicy {
    pub(crate) fn new<S: AsRef<str>>(origins: &[S]) -> Self {
        let allowed = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.as_ref()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(
                        origin = origin.as_ref(),
                        "origin is not a valid header value"
                    );
                    None
                }
            })
            .collect();
        Self {
            allowed: Arc::new(allowed),
        }
    }

    pub(crate) fn allows(&self, origin: &HeaderValue) -> bool {
        self.allowed.iter().any(|allowed| allowed == origin)
    }

    pub(crate) fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed.iter().cloned()))
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

/// Requests without an `Origin` header come from non-browser callers and
/// pass through.
pub(crate) async fn enforce_allow_list(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    match origin {
        None => next.run(request).await,
        Some(origin) if policy.allows(&origin) => {
            debug!(?origin, method = %request.method(), "request from allowed origin");
            next.run(request).await
        }
        Some(origin) => {
            warn!(?origin, method = %request.method(), "CORS blocked");
            let err = ApiError::new(ErrorCode::OriginRejected, "origin not in allow-list");
            (StatusCode::FORBIDDEN, Json(err.body())).into_response()
        }
    }
}
