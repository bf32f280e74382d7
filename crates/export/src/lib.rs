//! Serializes a [`FilledReport`](inventory_types::FilledReport) into one of the
//! supported output formats and wraps the bytes for delivery.
//!
//! All exporters are reached through [`exporter_for`], so adding a format means
//! adding one variant to `ExportFormat` and one arm to the dispatch table.

mod csv;
mod docx;
mod error;
mod exporter;
mod html;
mod package;
mod pdf;
mod pptx;
mod response;
mod xlsx;

pub use csv::{CsvExportConfiguration, CsvExporter};
pub use docx::DocxExporter;
pub use error::ExportError;
pub use exporter::{ExportSettings, ReportExporter, export, exporter_for};
pub use html::HtmlExporter;
pub use pdf::PdfExporter;
pub use pptx::PptxExporter;
pub use response::{DEFAULT_FILENAME_STEM, Disposition, ExportedReport, PREVIEW_FILENAME_STEM};
pub use xlsx::{XlsxExportConfiguration, XlsxExporter};
