use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Request-level error taxonomy. Everything a handler can fail with maps to
/// exactly one of these; the client always receives `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    /// Unexpected failure. The source is logged server-side; the client only
    /// sees the generic per-operation message.
    #[error("{public}")]
    Internal {
        public: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Adapter for `map_err` on service calls:
    /// `.map_err(ApiError::internal("Failed to fetch announcements"))`
    pub fn internal(public: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |source| ApiError::Internal { public, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { public, ref source } = self {
            error!("{public}: {source:#}");
        }
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::InvalidInput("Invalid date format").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("Announcement not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::internal("Failed to fetch announcements")(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_hides_source_from_client() {
        let err = ApiError::internal("Failed to create announcement")(anyhow::anyhow!(
            "connection reset by peer"
        ));
        assert_eq!(err.to_string(), "Failed to create announcement");
    }

    #[test]
    fn response_carries_status() {
        let resp = ApiError::Unauthorized.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
