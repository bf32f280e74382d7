use crate::error::ExportError;
use crate::exporter::ReportExporter;
use inventory_types::{Cell, ExportFormat, FilledReport};
use serde::Deserialize;
use std::borrow::Cow;

/// Delimited-text options. Output is always UTF-8.
///
/// `field_delimiter` must be a single ASCII character other than `"`.
/// `record_delimiter` is either `"\r\n"` or a single ASCII character.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CsvExportConfiguration {
    pub field_delimiter: char,
    pub record_delimiter: String,
}

impl Default for CsvExportConfiguration {
    fn default() -> Self {
        Self {
            field_delimiter: ',',
            record_delimiter: "\n".to_string(),
        }
    }
}

impl CsvExportConfiguration {
    fn writer_builder(&self) -> Result<csv::WriterBuilder, ExportError> {
        let delimiter = ascii_byte(self.field_delimiter).ok_or_else(|| {
            invalid(format!(
                "field delimiter {:?} is not a single ASCII character",
                self.field_delimiter
            ))
        })?;
        if delimiter == b'"' {
            return Err(invalid("field delimiter must not be the quote character".into()));
        }

        let terminator = match self.record_delimiter.as_str() {
            "\r\n" => csv::Terminator::CRLF,
            other => {
                let mut chars = other.chars();
                let byte = match (chars.next().and_then(ascii_byte), chars.next()) {
                    (Some(byte), None) => byte,
                    _ => {
                        return Err(invalid(format!(
                            "record delimiter {:?} must be \"\\r\\n\" or a single ASCII character",
                            other
                        )));
                    }
                };
                if byte == b'"' || byte == delimiter {
                    return Err(invalid(format!(
                        "record delimiter {:?} clashes with the quote or field delimiter",
                        other
                    )));
                }
                csv::Terminator::Any(byte)
            }
        };

        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(delimiter)
            .terminator(terminator)
            .quote_style(csv::QuoteStyle::Necessary);
        Ok(builder)
    }
}

fn ascii_byte(c: char) -> Option<u8> {
    c.is_ascii().then_some(c as u8)
}

fn invalid(message: String) -> ExportError {
    ExportError::InvalidConfiguration(format!("csv: {}", message))
}

/// Writes the column captions, then one line per detail row.
///
/// Title, footer and summary bands are layout, not data, and are left out.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvExportConfiguration,
}

impl CsvExporter {
    pub fn new(config: CsvExportConfiguration) -> Self {
        Self { config }
    }
}

impl ReportExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError> {
        let mut writer = self.config.writer_builder()?.from_writer(Vec::new());
        writer.write_record(report.headers())?;
        for row in report.rows() {
            writer.write_record(row.iter().map(|cell| match cell {
                Cell::Text(s) => Cow::Borrowed(s.as_bytes()),
                other => Cow::Owned(other.to_string().into_bytes()),
            }))?;
        }
        writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}
