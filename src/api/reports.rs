use crate::error::{ReportError, Result};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use inventory_export::{DEFAULT_FILENAME_STEM, Disposition, ExportedReport, PREVIEW_FILENAME_STEM};
use inventory_types::{ExportFormat, Item};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    /// Format tag, case-insensitive. Defaults to PDF.
    pub format: Option<String>,
}

impl FormatQuery {
    fn export_format(&self) -> Result<ExportFormat> {
        Ok(ExportFormat::from_optional(self.format.as_deref())?)
    }
}

/// All current items, shown inline.
pub async fn preview_report(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse> {
    let format = query.export_format()?;
    let items = state.repository.find_all().await?;
    render(&state, items, format, PREVIEW_FILENAME_STEM, Disposition::Inline).await
}

/// The items in the request body, as a download.
pub async fn generate_from_items(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    Json(items): Json<Vec<Item>>,
) -> Result<impl IntoResponse> {
    let format = query.export_format()?;
    render(&state, items, format, DEFAULT_FILENAME_STEM, Disposition::Attachment).await
}

/// All current items, as a download.
pub async fn generate_all(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse> {
    let format = query.export_format()?;
    let items = state.repository.find_all().await?;
    render(&state, items, format, DEFAULT_FILENAME_STEM, Disposition::Attachment).await
}

/// The fixed four-item sample set, as a download.
pub async fn sample_report(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse> {
    let format = query.export_format()?;
    render(
        &state,
        Item::sample_set(),
        format,
        DEFAULT_FILENAME_STEM,
        Disposition::Attachment,
    )
    .await
}

async fn render(
    state: &AppState,
    items: Vec<Item>,
    format: ExportFormat,
    stem: &'static str,
    disposition: Disposition,
) -> Result<Response> {
    let reports = state.reports.clone();
    let report: ExportedReport = tokio::task::spawn_blocking(move || {
        reports.export_report_as(&items, format, stem)
    })
    .await
    .map_err(|e| ReportError::Internal(format!("export task failed: {}", e)))??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                report.content_disposition(disposition),
            ),
        ],
        report.bytes,
    )
        .into_response())
}
