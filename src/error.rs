use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use inventory_export::ExportError;
use inventory_template::TemplateError;
use inventory_types::UnsupportedFormat;
use serde_json::json;

/// Failure of the resolve → compile → fill → export pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report template not found at '{0}'")]
    TemplateNotFound(String),

    #[error("Template compilation failed: {0}")]
    Compile(String),

    #[error("Report fill failed: {0}")]
    Fill(String),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error("Report encoding failed: {0}")]
    Encoding(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TemplateError> for ReportError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(path) => Self::TemplateNotFound(path),
            TemplateError::Compile(message) => Self::Compile(message),
            TemplateError::Fill(message) => Self::Fill(message),
            TemplateError::Resource(e) => Self::Internal(e.to_string()),
        }
    }
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error("Item {0} not found")]
    ItemNotFound(i64),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Report generation failed: {0}")]
    Report(ReportError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ReportError> for ServiceError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::UnsupportedFormat(e) => Self::UnsupportedFormat(e),
            other => Self::Report(other),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::UnsupportedFormat(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    self.to_string(),
                )
                    .into_response();
            }
            Self::Report(ref e) => {
                tracing::error!("Report generation failed: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            Self::ItemNotFound(_) => (StatusCode::NOT_FOUND, "ItemNotFound", self.to_string()),
            Self::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            Self::Database(_) | Self::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_errors_map_to_report_errors() {
        let err: ReportError = TemplateError::NotFound("reports/x.json".into()).into();
        assert!(matches!(err, ReportError::TemplateNotFound(ref p) if p == "reports/x.json"));

        let err: ReportError = TemplateError::Fill("record 0".into()).into();
        assert!(matches!(err, ReportError::Fill(_)));
    }

    #[test]
    fn test_unsupported_format_is_bad_request_with_text_body() {
        let err: ServiceError = ReportError::from(UnsupportedFormat("xml".into())).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_report_failure_is_internal_error() {
        let err: ServiceError = ReportError::TemplateNotFound("reports/x.json".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_item_is_not_found() {
        assert_eq!(
            ServiceError::ItemNotFound(7).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
