use crate::csv::{CsvExportConfiguration, CsvExporter};
use crate::docx::DocxExporter;
use crate::error::ExportError;
use crate::html::HtmlExporter;
use crate::pdf::PdfExporter;
use crate::pptx::PptxExporter;
use crate::xlsx::{XlsxExportConfiguration, XlsxExporter};
use inventory_types::{ExportFormat, FilledReport};
use serde::Deserialize;

/// Serializes a filled report into one output format.
///
/// Implementations are stateless apart from their configuration, so one
/// instance can serve any number of reports.
pub trait ReportExporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Produces the complete document, or an error and no bytes at all.
    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError>;
}

/// Per-format configuration. Formats without options are not listed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub xlsx: XlsxExportConfiguration,
    pub csv: CsvExportConfiguration,
}

pub fn exporter_for(format: ExportFormat, settings: &ExportSettings) -> Box<dyn ReportExporter> {
    match format {
        ExportFormat::Pdf => Box::new(PdfExporter::new()),
        ExportFormat::Xlsx => Box::new(XlsxExporter::new(settings.xlsx.clone())),
        ExportFormat::Csv => Box::new(CsvExporter::new(settings.csv.clone())),
        ExportFormat::Docx => Box::new(DocxExporter::new()),
        ExportFormat::Pptx => Box::new(PptxExporter::new()),
        ExportFormat::Html => Box::new(HtmlExporter::new()),
    }
}

pub fn export(
    report: &FilledReport,
    format: ExportFormat,
    settings: &ExportSettings,
) -> Result<Vec<u8>, ExportError> {
    let exporter = exporter_for(format, settings);
    let bytes = exporter.export(report)?;
    log::debug!(
        "Exported report '{}' as {}: {} row(s), {} bytes",
        report.name,
        format,
        report.row_count(),
        bytes.len()
    );
    Ok(bytes)
}
