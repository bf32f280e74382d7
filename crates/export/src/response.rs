use inventory_types::ExportFormat;

pub const DEFAULT_FILENAME_STEM: &str = "inventory-report";
pub const PREVIEW_FILENAME_STEM: &str = "report-preview";

/// How the client should present the download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Attachment,
    Inline,
}

/// Encoded report bytes together with the metadata the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub format: ExportFormat,
    pub content_type: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportedReport {
    pub fn assemble(bytes: Vec<u8>, format: ExportFormat) -> Self {
        Self::assemble_as(bytes, format, DEFAULT_FILENAME_STEM)
    }

    pub fn assemble_as(bytes: Vec<u8>, format: ExportFormat, stem: &str) -> Self {
        Self {
            format,
            content_type: format.mime_type(),
            filename: format!("{}.{}", stem, format.extension()),
            bytes,
        }
    }

    /// The `Content-Disposition` header value.
    pub fn content_disposition(&self, disposition: Disposition) -> String {
        let kind = match disposition {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        };
        format!("{}; filename=\"{}\"", kind, self.filename)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_maps_every_format() {
        for format in ExportFormat::ALL {
            let report = ExportedReport::assemble(vec![1, 2, 3], format);
            assert_eq!(report.content_type, format.mime_type());
            assert_eq!(report.filename, format!("inventory-report.{}", format.extension()));
            assert_eq!(report.len(), 3);
        }
    }

    #[test]
    fn test_content_types() {
        let csv = ExportedReport::assemble(vec![], ExportFormat::Csv);
        assert_eq!(csv.content_type, "text/csv; charset=utf-8");
        let xlsx = ExportedReport::assemble(vec![], ExportFormat::Xlsx);
        assert_eq!(
            xlsx.content_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_content_disposition() {
        let report = ExportedReport::assemble(vec![], ExportFormat::Pdf);
        assert_eq!(
            report.content_disposition(Disposition::Attachment),
            "attachment; filename=\"inventory-report.pdf\""
        );

        let preview = ExportedReport::assemble_as(vec![], ExportFormat::Html, PREVIEW_FILENAME_STEM);
        assert_eq!(
            preview.content_disposition(Disposition::Inline),
            "inline; filename=\"report-preview.html\""
        );
    }
}
