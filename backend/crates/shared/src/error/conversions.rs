//! Error conversions - IntoResponse implementation
//!
//! With the `axum` feature an [`AppError`] renders as an RFC 7807 problem
//! document.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "code": self.kind(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_into_response_status() {
        let response = AppError::service_unavailable("Store unavailable").into_response();
        assert_eq!(response.status().as_u16(), 503);
    }

    #[tokio::test]
    async fn test_problem_body() {
        let response = AppError::unauthorized("Login required")
            .with_action("Sign in")
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 401);
        assert_eq!(body["title"], "Unauthorized");
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["detail"], "Login required");
        assert_eq!(body["action"], "Sign in");
    }
}
