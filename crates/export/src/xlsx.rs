//! SpreadsheetML (`.xlsx`) export.

use crate::error::ExportError;
use crate::exporter::ReportExporter;
use crate::package::{
    CORE_PROPERTIES_REL, CORE_PROPERTIES_TYPE, DOC_RELATIONSHIPS_NS, OFFICE_DOCUMENT_REL, Package,
    XmlWriter, content_types, core_properties, relationships,
};
use inventory_types::{Cell, ExportFormat, FilledPage, FilledReport};
use serde::Deserialize;
use std::collections::BTreeSet;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const WORKBOOK_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const STYLES_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// Custom number formats start here; lower ids are reserved for built-ins.
const FIRST_CUSTOM_NUM_FMT: usize = 164;
/// Points per character of the default column width unit, roughly.
const POINTS_PER_WIDTH_UNIT: f32 = 5.25;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct XlsxExportConfiguration {
    /// Store numeric cells as numbers rather than text.
    pub detect_cell_type: bool,
    /// Fill every written cell with an opaque white background.
    pub white_page_background: bool,
    /// One worksheet per filled page instead of one sheet for the whole report.
    pub one_page_per_sheet: bool,
}

impl Default for XlsxExportConfiguration {
    fn default() -> Self {
        Self {
            detect_cell_type: true,
            white_page_background: false,
            one_page_per_sheet: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct XlsxExporter {
    config: XlsxExportConfiguration,
}

impl XlsxExporter {
    pub fn new(config: XlsxExportConfiguration) -> Self {
        Self { config }
    }
}

impl ReportExporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError> {
        let styles = StyleTable::for_report(report, &self.config);

        let sheets: Vec<(String, Vec<u8>)> = if self.config.one_page_per_sheet {
            report
                .pages
                .iter()
                .map(|page| -> Result<(String, Vec<u8>), ExportError> {
                    let sheet = SheetWriter::new(report, &self.config, &styles)
                        .write(std::slice::from_ref(page), true)?;
                    Ok((format!("Page {}", page.number), sheet))
                })
                .collect::<Result<_, ExportError>>()?
        } else {
            let sheet = SheetWriter::new(report, &self.config, &styles).write(&report.pages, false)?;
            vec![(sheet_name(&report.name), sheet)]
        };

        let mut overrides = vec![
            ("/xl/workbook.xml".to_string(), WORKBOOK_TYPE),
            ("/xl/styles.xml".to_string(), STYLES_TYPE),
            ("/docProps/core.xml".to_string(), CORE_PROPERTIES_TYPE),
        ];
        for index in 1..=sheets.len() {
            overrides.push((format!("/xl/worksheets/sheet{index}.xml"), WORKSHEET_TYPE));
        }

        let mut package = Package::new();
        package.add("[Content_Types].xml", &content_types(&overrides)?)?;
        package.add(
            "_rels/.rels",
            &relationships(&[
                ("rId1", OFFICE_DOCUMENT_REL, "xl/workbook.xml"),
                ("rId2", CORE_PROPERTIES_REL, "docProps/core.xml"),
            ])?,
        )?;
        package.add(
            "docProps/core.xml",
            &core_properties(report.title().unwrap_or(&report.name))?,
        )?;
        package.add("xl/workbook.xml", &workbook(&sheets)?)?;
        package.add("xl/_rels/workbook.xml.rels", &workbook_relationships(sheets.len())?)?;
        package.add("xl/styles.xml", &styles.to_xml()?)?;
        for (index, (_, sheet)) in sheets.iter().enumerate() {
            package.add(&format!("xl/worksheets/sheet{}.xml", index + 1), sheet)?;
        }
        package.finish()
    }
}

/// Sheet names are limited to 31 characters and may not contain `[]:*?/\`.
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}

/// `0` -> `A`, `25` -> `Z`, `26` -> `AA`.
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

fn workbook(sheets: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlWriter::document()?;
    xml.start(
        "workbook",
        &[("xmlns", SPREADSHEET_NS), ("xmlns:r", DOC_RELATIONSHIPS_NS)],
    )?;
    xml.start("sheets", &[])?;
    for (index, (name, _)) in sheets.iter().enumerate() {
        let sheet_id = (index + 1).to_string();
        let rel_id = format!("rId{}", index + 1);
        xml.empty(
            "sheet",
            &[("name", name), ("sheetId", &sheet_id), ("r:id", &rel_id)],
        )?;
    }
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.finish())
}

fn workbook_relationships(sheet_count: usize) -> Result<Vec<u8>, ExportError> {
    let targets: Vec<(String, String)> = (1..=sheet_count)
        .map(|i| (format!("rId{i}"), format!("worksheets/sheet{i}.xml")))
        .collect();
    let styles_id = format!("rId{}", sheet_count + 1);

    let mut entries: Vec<(&str, &str, &str)> = targets
        .iter()
        .map(|(id, target)| (id.as_str(), WORKSHEET_REL, target.as_str()))
        .collect();
    entries.push((styles_id.as_str(), STYLES_REL, "styles.xml"));
    relationships(&entries)
}

/// Cell formats referenced by `s="…"` in the sheets.
///
/// Index 0 is the default, 1 is bold; every distinct decimal scale in the
/// report gets its own number format after that.
struct StyleTable {
    scales: Vec<u8>,
    white_background: bool,
}

impl StyleTable {
    const DEFAULT: usize = 0;
    const BOLD: usize = 1;

    fn for_report(report: &FilledReport, config: &XlsxExportConfiguration) -> Self {
        let scales: BTreeSet<u8> = if config.detect_cell_type {
            report
                .rows()
                .flatten()
                .filter_map(|cell| match cell {
                    Cell::Decimal {
                        scale: Some(scale), ..
                    } => Some(*scale),
                    _ => None,
                })
                .collect()
        } else {
            BTreeSet::new()
        };
        Self {
            scales: scales.into_iter().collect(),
            white_background: config.white_page_background,
        }
    }

    fn for_cell(&self, cell: &Cell) -> usize {
        match cell {
            Cell::Decimal {
                scale: Some(scale), ..
            } => self
                .scales
                .iter()
                .position(|s| s == scale)
                .map_or(Self::DEFAULT, |i| i + 2),
            _ => Self::DEFAULT,
        }
    }

    fn to_xml(&self) -> Result<Vec<u8>, ExportError> {
        let mut xml = XmlWriter::document()?;
        xml.start("styleSheet", &[("xmlns", SPREADSHEET_NS)])?;

        if !self.scales.is_empty() {
            let count = self.scales.len().to_string();
            xml.start("numFmts", &[("count", &count)])?;
            for (i, scale) in self.scales.iter().enumerate() {
                let id = (FIRST_CUSTOM_NUM_FMT + i).to_string();
                let code = if *scale == 0 {
                    "0".to_string()
                } else {
                    format!("0.{}", "0".repeat(*scale as usize))
                };
                xml.empty("numFmt", &[("numFmtId", &id), ("formatCode", &code)])?;
            }
            xml.end("numFmts")?;
        }

        xml.start("fonts", &[("count", "2")])?;
        xml.start("font", &[])?;
        xml.empty("sz", &[("val", "11")])?;
        xml.empty("name", &[("val", "Calibri")])?;
        xml.end("font")?;
        xml.start("font", &[])?;
        xml.empty("b", &[])?;
        xml.empty("sz", &[("val", "11")])?;
        xml.empty("name", &[("val", "Calibri")])?;
        xml.end("font")?;
        xml.end("fonts")?;

        // The first two fills are reserved by the format.
        let fill_count = if self.white_background { "3" } else { "2" };
        xml.start("fills", &[("count", fill_count)])?;
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", "none")])?;
        xml.end("fill")?;
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", "gray125")])?;
        xml.end("fill")?;
        if self.white_background {
            xml.start("fill", &[])?;
            xml.start("patternFill", &[("patternType", "solid")])?;
            xml.empty("fgColor", &[("rgb", "FFFFFFFF")])?;
            xml.empty("bgColor", &[("indexed", "64")])?;
            xml.end("patternFill")?;
            xml.end("fill")?;
        }
        xml.end("fills")?;

        xml.start("borders", &[("count", "1")])?;
        xml.empty("border", &[])?;
        xml.end("borders")?;

        xml.start("cellStyleXfs", &[("count", "1")])?;
        xml.empty(
            "xf",
            &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")],
        )?;
        xml.end("cellStyleXfs")?;

        let fill_id = if self.white_background { "2" } else { "0" };
        let xf_count = (2 + self.scales.len()).to_string();
        xml.start("cellXfs", &[("count", &xf_count)])?;
        self.write_xf(&mut xml, "0", "0", fill_id)?;
        self.write_xf(&mut xml, "0", "1", fill_id)?;
        for i in 0..self.scales.len() {
            let id = (FIRST_CUSTOM_NUM_FMT + i).to_string();
            self.write_xf(&mut xml, &id, "0", fill_id)?;
        }
        xml.end("cellXfs")?;

        xml.end("styleSheet")?;
        Ok(xml.finish())
    }

    fn write_xf(
        &self,
        xml: &mut XmlWriter,
        num_fmt: &str,
        font: &str,
        fill: &str,
    ) -> Result<(), ExportError> {
        let mut attrs = vec![
            ("numFmtId", num_fmt),
            ("fontId", font),
            ("fillId", fill),
            ("borderId", "0"),
            ("xfId", "0"),
        ];
        if num_fmt != "0" {
            attrs.push(("applyNumberFormat", "1"));
        }
        if font != "0" {
            attrs.push(("applyFont", "1"));
        }
        if self.white_background {
            attrs.push(("applyFill", "1"));
        }
        xml.empty("xf", &attrs)
    }
}

/// Writes one worksheet, tracking the current row number.
struct SheetWriter<'a> {
    report: &'a FilledReport,
    config: &'a XlsxExportConfiguration,
    styles: &'a StyleTable,
    row: usize,
}

impl<'a> SheetWriter<'a> {
    fn new(
        report: &'a FilledReport,
        config: &'a XlsxExportConfiguration,
        styles: &'a StyleTable,
    ) -> Self {
        Self {
            report,
            config,
            styles,
            row: 0,
        }
    }

    /// Title and column header go first, then the rows of every page in order.
    /// The summary follows the rows; footers are written only in
    /// sheet-per-page mode, where each sheet stands for a printed page.
    fn write(mut self, pages: &[FilledPage], with_footer: bool) -> Result<Vec<u8>, ExportError> {
        let mut xml = XmlWriter::document()?;
        xml.start("worksheet", &[("xmlns", SPREADSHEET_NS)])?;

        xml.start("cols", &[])?;
        for (i, column) in self.report.columns.iter().enumerate() {
            let index = (i + 1).to_string();
            let width = format!("{:.2}", column.width / POINTS_PER_WIDTH_UNIT);
            xml.empty(
                "col",
                &[
                    ("min", &index),
                    ("max", &index),
                    ("width", &width),
                    ("customWidth", "1"),
                ],
            )?;
        }
        xml.end("cols")?;

        xml.start("sheetData", &[])?;
        for title in pages.iter().filter_map(|p| p.title.as_deref()) {
            self.text_row(&mut xml, title, StyleTable::BOLD)?;
        }

        let headers: Vec<Cell> = self
            .report
            .headers()
            .map(|h| Cell::Text(h.to_string()))
            .collect();
        self.cell_row(&mut xml, &headers, StyleTable::BOLD)?;

        for page in pages {
            for row in &page.rows {
                self.cell_row(&mut xml, row, StyleTable::DEFAULT)?;
            }
        }
        for page in pages {
            if let Some(summary) = &page.summary {
                self.text_row(&mut xml, summary, StyleTable::BOLD)?;
            }
        }
        if with_footer {
            for page in pages {
                if let Some(footer) = &page.footer {
                    self.text_row(&mut xml, footer, StyleTable::DEFAULT)?;
                }
            }
        }
        xml.end("sheetData")?;

        xml.end("worksheet")?;
        Ok(xml.finish())
    }

    fn text_row(&mut self, xml: &mut XmlWriter, text: &str, style: usize) -> Result<(), ExportError> {
        self.cell_row(xml, &[Cell::Text(text.to_string())], style)
    }

    fn cell_row(&mut self, xml: &mut XmlWriter, cells: &[Cell], style: usize) -> Result<(), ExportError> {
        self.row += 1;
        let row_number = self.row.to_string();
        xml.start("row", &[("r", &row_number)])?;
        for (i, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letter(i), self.row);
            self.write_cell(xml, &reference, cell, style)?;
        }
        xml.end("row")
    }

    fn write_cell(
        &self,
        xml: &mut XmlWriter,
        reference: &str,
        cell: &Cell,
        row_style: usize,
    ) -> Result<(), ExportError> {
        let style = if row_style == StyleTable::DEFAULT {
            self.styles.for_cell(cell)
        } else {
            row_style
        };
        let style_id = style.to_string();
        let mut attrs = vec![("r", reference)];
        if style != StyleTable::DEFAULT {
            attrs.push(("s", style_id.as_str()));
        }

        match (cell, cell.as_number()) {
            (Cell::Empty, _) => {
                if style != StyleTable::DEFAULT || self.styles.white_background {
                    xml.empty("c", &attrs)?;
                }
            }
            (_, Some(number)) if self.config.detect_cell_type => {
                xml.start("c", &attrs)?;
                xml.text_element("v", &[], &number.to_string())?;
                xml.end("c")?;
            }
            _ => {
                attrs.push(("t", "inlineStr"));
                xml.start("c", &attrs)?;
                xml.start("is", &[])?;
                xml.text_element("t", &[("xml:space", "preserve")], &cell.to_string())?;
                xml.end("is")?;
                xml.end("c")?;
            }
        }
        Ok(())
    }
}
