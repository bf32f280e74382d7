use crate::error::ExportError;
use crate::exporter::ReportExporter;
use inventory_render_lopdf::LopdfRenderer;
use inventory_types::{ExportFormat, FilledReport};

#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    renderer: LopdfRenderer,
}

impl PdfExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError> {
        Ok(self.renderer.render(report)?)
    }
}
