//! WordprocessingML (`.docx`) export.
//!
//! Each filled page becomes a title paragraph (first page only), a table with
//! a repeated header row, the summary and footer paragraphs, and a page break.

use crate::error::ExportError;
use crate::exporter::ReportExporter;
use crate::package::{
    CORE_PROPERTIES_REL, CORE_PROPERTIES_TYPE, OFFICE_DOCUMENT_REL, Package, TWIPS_PER_POINT,
    XmlWriter, content_types, core_properties, relationships,
};
use inventory_types::{Align, BandStyle, Cell, ExportFormat, FilledPage, FilledReport};

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const HEADER_SHADE: &str = "D9D9D9";

#[derive(Debug, Clone, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportExporter for DocxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError> {
        let overrides = [
            ("/word/document.xml".to_string(), DOCUMENT_TYPE),
            ("/docProps/core.xml".to_string(), CORE_PROPERTIES_TYPE),
        ];

        let mut package = Package::new();
        package.add("[Content_Types].xml", &content_types(&overrides)?)?;
        package.add(
            "_rels/.rels",
            &relationships(&[
                ("rId1", OFFICE_DOCUMENT_REL, "word/document.xml"),
                ("rId2", CORE_PROPERTIES_REL, "docProps/core.xml"),
            ])?,
        )?;
        package.add(
            "docProps/core.xml",
            &core_properties(report.title().unwrap_or(&report.name))?,
        )?;
        package.add("word/document.xml", &document(report)?)?;
        package.finish()
    }
}

fn twips(points: f32) -> String {
    ((points * TWIPS_PER_POINT).round() as i64).to_string()
}

fn half_points(font_size: f32) -> String {
    ((font_size * 2.0).round() as i64).to_string()
}

fn justification(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    }
}

fn document(report: &FilledReport) -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlWriter::document()?;
    xml.start("w:document", &[("xmlns:w", WORDPROCESSING_NS)])?;
    xml.start("w:body", &[])?;

    let last = report.pages.len().saturating_sub(1);
    for (index, page) in report.pages.iter().enumerate() {
        write_page(&mut xml, report, page)?;
        if index < last {
            xml.start("w:p", &[])?;
            xml.start("w:r", &[])?;
            xml.empty("w:br", &[("w:type", "page")])?;
            xml.end("w:r")?;
            xml.end("w:p")?;
        }
    }

    let format = &report.page_format;
    let margin = twips(format.margin);
    xml.start("w:sectPr", &[])?;
    xml.empty(
        "w:pgSz",
        &[("w:w", &twips(format.width)), ("w:h", &twips(format.height))],
    )?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", &margin),
            ("w:right", &margin),
            ("w:bottom", &margin),
            ("w:left", &margin),
            ("w:header", "0"),
            ("w:footer", "0"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn write_page(xml: &mut XmlWriter, report: &FilledReport, page: &FilledPage) -> Result<(), ExportError> {
    if let Some(title) = &page.title {
        paragraph(xml, title, report.title_style, true, Align::Center)?;
    }

    write_table(xml, report, &page.rows)?;

    if let Some(summary) = &page.summary {
        paragraph(xml, summary, report.summary_style, true, Align::Left)?;
    }
    match &page.footer {
        Some(footer) => paragraph(xml, footer, report.footer_style, false, Align::Center)?,
        // A table may not be the last block before the section properties.
        None if page.summary.is_none() => xml.empty("w:p", &[])?,
        None => {}
    }
    Ok(())
}

fn write_table(xml: &mut XmlWriter, report: &FilledReport, rows: &[Vec<Cell>]) -> Result<(), ExportError> {
    let total_width: f32 = report.columns.iter().map(|c| c.width).sum();

    xml.start("w:tbl", &[])?;
    xml.start("w:tblPr", &[])?;
    xml.empty("w:tblW", &[("w:w", &twips(total_width)), ("w:type", "dxa")])?;
    xml.empty("w:tblLayout", &[("w:type", "fixed")])?;
    xml.start("w:tblBorders", &[])?;
    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        xml.empty(
            edge,
            &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", "999999")],
        )?;
    }
    xml.end("w:tblBorders")?;
    xml.end("w:tblPr")?;

    xml.start("w:tblGrid", &[])?;
    for column in &report.columns {
        xml.empty("w:gridCol", &[("w:w", &twips(column.width))])?;
    }
    xml.end("w:tblGrid")?;

    xml.start("w:tr", &[])?;
    xml.start("w:trPr", &[])?;
    xml.empty("w:tblHeader", &[])?;
    xml.end("w:trPr")?;
    for column in &report.columns {
        table_cell(xml, &column.header, column.width, column.align, report.header_style, true)?;
    }
    xml.end("w:tr")?;

    for row in rows {
        xml.start("w:tr", &[])?;
        for (column, cell) in report.columns.iter().zip(row) {
            table_cell(
                xml,
                &cell.to_string(),
                column.width,
                column.align,
                report.detail_style,
                false,
            )?;
        }
        xml.end("w:tr")?;
    }

    xml.end("w:tbl")
}

fn table_cell(
    xml: &mut XmlWriter,
    text: &str,
    width: f32,
    align: Align,
    style: BandStyle,
    header: bool,
) -> Result<(), ExportError> {
    xml.start("w:tc", &[])?;
    xml.start("w:tcPr", &[])?;
    xml.empty("w:tcW", &[("w:w", &twips(width)), ("w:type", "dxa")])?;
    if header {
        xml.empty(
            "w:shd",
            &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", HEADER_SHADE)],
        )?;
    }
    xml.end("w:tcPr")?;
    paragraph(xml, text, style, header, align)?;
    xml.end("w:tc")
}

fn paragraph(
    xml: &mut XmlWriter,
    text: &str,
    style: BandStyle,
    bold: bool,
    align: Align,
) -> Result<(), ExportError> {
    let size = half_points(style.font_size);
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:jc", &[("w:val", justification(align))])?;
    xml.end("w:pPr")?;
    if !text.is_empty() {
        xml.start("w:r", &[])?;
        xml.start("w:rPr", &[])?;
        if bold {
            xml.empty("w:b", &[])?;
        }
        xml.empty("w:sz", &[("w:val", &size)])?;
        xml.end("w:rPr")?;
        xml.text_element("w:t", &[("xml:space", "preserve")], text)?;
        xml.end("w:r")?;
    }
    xml.end("w:p")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(twips(40.0), "800");
        assert_eq!(twips(595.0), "11900");
        assert_eq!(half_points(10.0), "20");
        assert_eq!(half_points(10.5), "21");
    }
}
