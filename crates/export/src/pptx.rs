//! PresentationML (`.pptx`) export: one slide per filled page.

use crate::error::ExportError;
use crate::exporter::ReportExporter;
use crate::package::{
    CORE_PROPERTIES_REL, CORE_PROPERTIES_TYPE, DOC_RELATIONSHIPS_NS, EMU_PER_POINT,
    OFFICE_DOCUMENT_REL, Package, XmlWriter, content_types, core_properties, relationships,
};
use inventory_types::{Align, BandStyle, ExportFormat, FilledPage, FilledReport};

const PRESENTATION_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const SLIDE_MASTER_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const SLIDE_LAYOUT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const THEME_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

const PRESENTATION_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const SLIDE_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const SLIDE_MASTER_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const SLIDE_LAYOUT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const THEME_TYPE: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

/// Slides may not be smaller than one inch on either side.
const MIN_SLIDE_EMU: i64 = 914_400;
const HEADER_SHADE: &str = "D9D9D9";

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Report"><a:themeElements><a:clrScheme name="Report"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F1F1F"/></a:dk2><a:lt2><a:srgbClr val="EEEEEE"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Report"><a:majorFont><a:latin typeface="Helvetica"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Helvetica"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Report"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[derive(Debug, Clone, Default)]
pub struct PptxExporter;

impl PptxExporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportExporter for PptxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pptx
    }

    fn export(&self, report: &FilledReport) -> Result<Vec<u8>, ExportError> {
        let slide_count = report.pages.len();

        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), PRESENTATION_TYPE),
            ("/ppt/slideMasters/slideMaster1.xml".to_string(), SLIDE_MASTER_TYPE),
            ("/ppt/slideLayouts/slideLayout1.xml".to_string(), SLIDE_LAYOUT_TYPE),
            ("/ppt/theme/theme1.xml".to_string(), THEME_TYPE),
            ("/docProps/core.xml".to_string(), CORE_PROPERTIES_TYPE),
        ];
        for index in 1..=slide_count {
            overrides.push((format!("/ppt/slides/slide{index}.xml"), SLIDE_TYPE));
        }

        let mut package = Package::new();
        package.add("[Content_Types].xml", &content_types(&overrides)?)?;
        package.add(
            "_rels/.rels",
            &relationships(&[
                ("rId1", OFFICE_DOCUMENT_REL, "ppt/presentation.xml"),
                ("rId2", CORE_PROPERTIES_REL, "docProps/core.xml"),
            ])?,
        )?;
        package.add("docProps/core.xml", &core_properties(deck_title(report))?)?;
        package.add("ppt/presentation.xml", &presentation(report)?)?;
        package.add(
            "ppt/_rels/presentation.xml.rels",
            &presentation_relationships(slide_count)?,
        )?;
        package.add("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML.as_bytes())?;
        package.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                ("rId1", SLIDE_LAYOUT_REL, "../slideLayouts/slideLayout1.xml"),
                ("rId2", THEME_REL, "../theme/theme1.xml"),
            ])?,
        )?;
        package.add("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML.as_bytes())?;
        package.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[("rId1", SLIDE_MASTER_REL, "../slideMasters/slideMaster1.xml")])?,
        )?;
        package.add("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

        let slide_rels =
            relationships(&[("rId1", SLIDE_LAYOUT_REL, "../slideLayouts/slideLayout1.xml")])?;
        for (index, page) in report.pages.iter().enumerate() {
            let number = index + 1;
            package.add(
                &format!("ppt/slides/slide{number}.xml"),
                &SlideWriter::new(report).write(page)?,
            )?;
            package.add(&format!("ppt/slides/_rels/slide{number}.xml.rels"), &slide_rels)?;
        }
        package.finish()
    }
}

fn deck_title(report: &FilledReport) -> &str {
    report.title().unwrap_or(&report.name)
}

fn emu(points: f32) -> i64 {
    (points as f64 * EMU_PER_POINT as f64).round() as i64
}

fn presentation(report: &FilledReport) -> Result<Vec<u8>, ExportError> {
    let format = &report.page_format;
    let cx = emu(format.width).max(MIN_SLIDE_EMU).to_string();
    let cy = emu(format.height).max(MIN_SLIDE_EMU).to_string();

    let mut xml = XmlWriter::document()?;
    xml.start(
        "p:presentation",
        &[
            ("xmlns:a", DRAWING_NS),
            ("xmlns:r", DOC_RELATIONSHIPS_NS),
            ("xmlns:p", PRESENTATION_NS),
        ],
    )?;
    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;
    xml.start("p:sldIdLst", &[])?;
    for index in 0..report.pages.len() {
        let id = (256 + index).to_string();
        let rel_id = format!("rId{}", index + 2);
        xml.empty("p:sldId", &[("id", &id), ("r:id", &rel_id)])?;
    }
    xml.end("p:sldIdLst")?;
    xml.empty("p:sldSz", &[("cx", &cx), ("cy", &cy)])?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

/// `rId1` is the master, slides follow from `rId2`, the theme comes last.
fn presentation_relationships(slide_count: usize) -> Result<Vec<u8>, ExportError> {
    let slides: Vec<(String, String)> = (1..=slide_count)
        .map(|i| (format!("rId{}", i + 1), format!("slides/slide{i}.xml")))
        .collect();
    let theme_id = format!("rId{}", slide_count + 2);

    let mut entries: Vec<(&str, &str, &str)> =
        vec![("rId1", SLIDE_MASTER_REL, "slideMasters/slideMaster1.xml")];
    entries.extend(
        slides
            .iter()
            .map(|(id, target)| (id.as_str(), SLIDE_REL, target.as_str())),
    );
    entries.push((theme_id.as_str(), THEME_REL, "theme/theme1.xml"));
    relationships(&entries)
}

/// Places the bands of one page on a slide, top to bottom.
struct SlideWriter<'a> {
    report: &'a FilledReport,
    next_shape_id: u32,
    cursor: f32,
}

impl<'a> SlideWriter<'a> {
    fn new(report: &'a FilledReport) -> Self {
        Self {
            report,
            next_shape_id: 2,
            cursor: report.page_format.margin,
        }
    }

    fn write(mut self, page: &FilledPage) -> Result<Vec<u8>, ExportError> {
        let report = self.report;

        let mut out = XmlWriter::document()?;
        out.start(
            "p:sld",
            &[
                ("xmlns:a", DRAWING_NS),
                ("xmlns:r", DOC_RELATIONSHIPS_NS),
                ("xmlns:p", PRESENTATION_NS),
            ],
        )?;
        out.start("p:cSld", &[])?;
        out.start("p:spTree", &[])?;
        out.start("p:nvGrpSpPr", &[])?;
        out.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
        out.empty("p:cNvGrpSpPr", &[])?;
        out.empty("p:nvPr", &[])?;
        out.end("p:nvGrpSpPr")?;
        out.empty("p:grpSpPr", &[])?;

        let title = page.title.as_deref().unwrap_or_else(|| deck_title(report));
        let style = report.title_style;
        self.text_box(&mut out, "Title", title, style, true, Align::Center)?;
        self.cursor += style.height;

        self.table(&mut out, page)?;

        if let Some(summary) = &page.summary {
            let style = report.summary_style;
            self.text_box(&mut out, "Summary", summary, style, true, Align::Left)?;
            self.cursor += style.height;
        }
        if let Some(footer) = &page.footer {
            let style = report.footer_style;
            self.cursor = report.page_format.height - report.page_format.margin - style.height;
            self.text_box(&mut out, "Footer", footer, style, false, Align::Center)?;
        }

        out.end("p:spTree")?;
        out.end("p:cSld")?;
        out.start("p:clrMapOvr", &[])?;
        out.empty("a:masterClrMapping", &[])?;
        out.end("p:clrMapOvr")?;
        out.end("p:sld")?;
        Ok(out.finish())
    }

    fn shape_id(&mut self) -> String {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id.to_string()
    }

    fn transform(
        xml: &mut XmlWriter,
        tag: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ExportError> {
        let (x, y, cx, cy) = (
            emu(x).to_string(),
            emu(y).to_string(),
            emu(width).to_string(),
            emu(height).to_string(),
        );
        xml.start(tag, &[])?;
        xml.empty("a:off", &[("x", &x), ("y", &y)])?;
        xml.empty("a:ext", &[("cx", &cx), ("cy", &cy)])?;
        xml.end(tag)
    }

    /// A text shape spanning the content width at the current cursor.
    fn text_box(
        &mut self,
        xml: &mut XmlWriter,
        name: &str,
        text: &str,
        style: BandStyle,
        bold: bool,
        align: Align,
    ) -> Result<(), ExportError> {
        let id = self.shape_id();
        xml.start("p:sp", &[])?;
        xml.start("p:nvSpPr", &[])?;
        xml.empty("p:cNvPr", &[("id", &id), ("name", name)])?;
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
        xml.empty("p:nvPr", &[])?;
        xml.end("p:nvSpPr")?;
        xml.start("p:spPr", &[])?;
        let format = &self.report.page_format;
        let (x, width) = (format.margin, format.content_size().width);
        Self::transform(xml, "a:xfrm", x, self.cursor, width, style.height)?;
        xml.start("a:prstGeom", &[("prst", "rect")])?;
        xml.empty("a:avLst", &[])?;
        xml.end("a:prstGeom")?;
        xml.end("p:spPr")?;
        xml.start("p:txBody", &[])?;
        xml.empty("a:bodyPr", &[("anchor", "ctr")])?;
        xml.empty("a:lstStyle", &[])?;
        text_paragraph(xml, text, style, bold, align)?;
        xml.end("p:txBody")?;
        xml.end("p:sp")
    }

    fn table(&mut self, xml: &mut XmlWriter, page: &FilledPage) -> Result<(), ExportError> {
        let report = self.report;
        let width: f32 = report.columns.iter().map(|c| c.width).sum();
        let height = report.header_style.height + page.rows.len() as f32 * report.detail_style.height;
        let id = self.shape_id();

        xml.start("p:graphicFrame", &[])?;
        xml.start("p:nvGraphicFramePr", &[])?;
        xml.empty("p:cNvPr", &[("id", &id), ("name", "Table")])?;
        xml.start("p:cNvGraphicFramePr", &[])?;
        xml.empty("a:graphicFrameLocks", &[("noGrp", "1")])?;
        xml.end("p:cNvGraphicFramePr")?;
        xml.empty("p:nvPr", &[])?;
        xml.end("p:nvGraphicFramePr")?;
        Self::transform(xml, "p:xfrm", report.page_format.margin, self.cursor, width, height)?;
        xml.start("a:graphic", &[])?;
        xml.start("a:graphicData", &[("uri", TABLE_URI)])?;
        xml.start("a:tbl", &[])?;
        xml.empty("a:tblPr", &[("firstRow", "1")])?;
        xml.start("a:tblGrid", &[])?;
        for column in &report.columns {
            xml.empty("a:gridCol", &[("w", &emu(column.width).to_string())])?;
        }
        xml.end("a:tblGrid")?;

        let header_height = emu(report.header_style.height).to_string();
        xml.start("a:tr", &[("h", &header_height)])?;
        for column in &report.columns {
            table_cell(xml, &column.header, report.header_style, column.align, true)?;
        }
        xml.end("a:tr")?;

        let row_height = emu(report.detail_style.height).to_string();
        for row in &page.rows {
            xml.start("a:tr", &[("h", &row_height)])?;
            for (column, cell) in report.columns.iter().zip(row) {
                table_cell(xml, &cell.to_string(), report.detail_style, column.align, false)?;
            }
            xml.end("a:tr")?;
        }

        xml.end("a:tbl")?;
        xml.end("a:graphicData")?;
        xml.end("a:graphic")?;
        xml.end("p:graphicFrame")?;

        self.cursor += height;
        Ok(())
    }
}

fn alignment(align: Align) -> &'static str {
    match align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    }
}

fn text_paragraph(
    xml: &mut XmlWriter,
    text: &str,
    style: BandStyle,
    bold: bool,
    align: Align,
) -> Result<(), ExportError> {
    // Hundredths of a point.
    let size = ((style.font_size * 100.0).round() as i64).to_string();
    xml.start("a:p", &[])?;
    xml.empty("a:pPr", &[("algn", alignment(align))])?;
    if !text.is_empty() {
        xml.start("a:r", &[])?;
        xml.empty(
            "a:rPr",
            &[("lang", "en-US"), ("sz", &size), ("b", if bold { "1" } else { "0" })],
        )?;
        xml.text_element("a:t", &[], text)?;
        xml.end("a:r")?;
    }
    xml.end("a:p")
}

fn table_cell(
    xml: &mut XmlWriter,
    text: &str,
    style: BandStyle,
    align: Align,
    header: bool,
) -> Result<(), ExportError> {
    xml.start("a:tc", &[])?;
    xml.start("a:txBody", &[])?;
    xml.empty("a:bodyPr", &[])?;
    xml.empty("a:lstStyle", &[])?;
    text_paragraph(xml, text, style, header, align)?;
    xml.end("a:txBody")?;
    if header {
        xml.start("a:tcPr", &[])?;
        xml.start("a:solidFill", &[])?;
        xml.empty("a:srgbClr", &[("val", HEADER_SHADE)])?;
        xml.end("a:solidFill")?;
        xml.end("a:tcPr")?;
    } else {
        xml.empty("a:tcPr", &[])?;
    }
    xml.end("a:tc")
}
