use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::error::SitacError;

/// Error surfaced to HTTP clients as `{ "detail": ... }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn internal(detail: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.to_string(),
        }
    }
}

impl From<SitacError> for ApiError {
    fn from(err: SitacError) -> Self {
        let status = match &err {
            SitacError::NotFound(_) => StatusCode::NOT_FOUND,
            SitacError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = match &err {
            SitacError::NotFound(what) => format!("{} not found", capitalize(what)),
            SitacError::Forbidden => "Invalid edit token".to_string(),
            other => other.to_string(),
        };
        Self { status, detail }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.detail, "request failed");
        } else {
            debug!(status = %self.status, detail = %self.detail, "request rejected");
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SitacError::not_found("briefing"), StatusCode::NOT_FOUND, "Briefing not found"),
            (SitacError::Forbidden, StatusCode::FORBIDDEN, "Invalid edit token"),
            (SitacError::EmptyZones, StatusCode::INTERNAL_SERVER_ERROR, "sitac without zones"),
            (
                SitacError::Config("bad base".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "config: bad base",
            ),
        ];
        for (err, status, detail) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.detail, detail);
        }
    }
}
