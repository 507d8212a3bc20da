use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Everything token- or session-shaped collapses into the single
/// `Unauthenticated` kind before it reaches a client; the response body never
/// echoes a submitted code and never says more about an email address than
/// "unknown email".
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("unknown email")]
    UnknownEmail,
    #[error("too many code requests")]
    RateLimited { retry_after_secs: u64 },
    #[error("code delivery unavailable")]
    DeliveryUnavailable,
    #[error("invalid code")]
    InvalidCode,
    #[error("code expired")]
    ExpiredCode { overage_minutes: i64 },
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownEmail => "UNKNOWN_EMAIL",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::DeliveryUnavailable => "DELIVERY_UNAVAILABLE",
            Self::InvalidCode => "INVALID_CODE",
            Self::ExpiredCode { .. } => "EXPIRED_CODE",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownEmail => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::DeliveryUnavailable | Self::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::InvalidCode | Self::ExpiredCode { .. } | Self::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 5xx only — tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; logging them here
        // would be noise. 5xx need the source chain logged so the root cause is
        // traceable.
        match &self {
            Self::StoreUnavailable(e) => {
                tracing::error!(error = %e, kind = "STORE_UNAVAILABLE", "store unavailable");
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::RateLimited { retry_after_secs } => {
                body["retry_after_secs"] = (*retry_after_secs).into();
            }
            Self::ExpiredCode { overage_minutes } => {
                body["overage_minutes"] = (*overage_minutes).into();
            }
            _ => {}
        }
        (status, axum::Json(body)).into_response()
    }
}
