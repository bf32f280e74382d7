use crate::error::ExportError;
use crate::exporter::ReportExporter;
use crate::package::XmlWriter;
use inventory_types::{Align, ExportFormat, FilledReport};

/// Writes an embeddable fragment: a single `<div class="report">` holding
/// one table per filled page. No `<html>` or `<body>` wrapper.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }
}

fn align_class(align: Align) -> &'static str {
    match align {
        Align::Left => "align-left",
        Align::Center => "align-center",
        Align::Right => "align-right",
    }
}

impl ReportExporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError> {
        let mut html = XmlWriter::fragment();
        html.start("div", &[("class", "report")])?;

        for page in &report.pages {
            if let Some(title) = &page.title {
                html.text_element("h1", &[("class", "report-title")], title)?;
            }

            let number = page.number.to_string();
            html.start("table", &[("class", "report-page"), ("data-page", &number)])?;
            html.start("thead", &[])?;
            html.start("tr", &[])?;
            for column in &report.columns {
                html.text_element("th", &[("class", align_class(column.align))], &column.header)?;
            }
            html.end("tr")?;
            html.end("thead")?;

            html.start("tbody", &[])?;
            for row in &page.rows {
                html.start("tr", &[])?;
                for (column, cell) in report.columns.iter().zip(row) {
                    html.text_element(
                        "td",
                        &[("class", align_class(column.align))],
                        &cell.to_string(),
                    )?;
                }
                html.end("tr")?;
            }
            html.end("tbody")?;
            html.end("table")?;

            if let Some(summary) = &page.summary {
                html.text_element("p", &[("class", "report-summary")], summary)?;
            }
            if let Some(footer) = &page.footer {
                html.text_element("p", &[("class", "report-footer")], footer)?;
            }
        }

        html.end("div")?;
        Ok(html.finish())
    }
}
