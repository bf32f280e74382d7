use crate::error::RenderError;
use crate::helpers::{encode_win_ansi, fit_text, text_width};
use inventory_types::{Align, BandStyle, Cell, FilledPage, FilledReport};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";
const CELL_PADDING: f32 = 4.0;
const HEADER_SHADE: f32 = 0.85;
const RULE_GRAY: f32 = 0.6;

const PRODUCER: &str = concat!("inventory-report ", env!("CARGO_PKG_VERSION"));

/// Writes a [`FilledReport`] as a PDF document, one PDF page per filled page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &FilledReport) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica", "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica-Bold", "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { REGULAR_FONT => regular_id, BOLD_FONT => bold_id },
        });

        let format = &report.page_format;
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            format.width.into(),
            format.height.into(),
        ];

        let blank = FilledPage {
            number: 1,
            title: None,
            rows: Vec::new(),
            footer: None,
            summary: None,
        };
        let pages: Vec<&FilledPage> = if report.pages.is_empty() {
            vec![&blank]
        } else {
            report.pages.iter().collect()
        };

        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = PageContext::new(report).draw_page(page);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id);
        }

        let count = page_ids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<Object>>(),
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let title = report.title().unwrap_or(&report.name);
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "Producer" => Object::String(encode_win_ansi(PRODUCER), StringFormat::Literal),
        });
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        log::debug!(
            "Rendered report '{}' to PDF: {} page(s), {} bytes",
            report.name,
            count,
            buffer.len()
        );
        Ok(buffer)
    }
}

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font_name: &'static str,
    font_size: f32,
    fill_gray: Option<f32>,
}

/// Builds the content stream for one page. Coordinates are tracked from the
/// top of the page and flipped when emitted.
struct PageContext<'a> {
    report: &'a FilledReport,
    content: Content,
    state: PageRenderState,
    cursor: f32,
}

impl<'a> PageContext<'a> {
    fn new(report: &'a FilledReport) -> Self {
        Self {
            report,
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
            cursor: report.page_format.margin,
        }
    }

    fn draw_page(mut self, page: &FilledPage) -> Content {
        let report = self.report;
        let margin = report.page_format.margin;
        let content_width = report.page_format.content_size().width;

        if let Some(title) = &page.title {
            let style = report.title_style;
            self.draw_text_box(title, margin, content_width, style, BOLD_FONT, Align::Center);
            self.cursor += style.height;
        }

        self.draw_column_header();
        for row in &page.rows {
            self.draw_row(row);
        }

        if let Some(summary) = &page.summary {
            let style = report.summary_style;
            self.draw_rule(self.cursor);
            self.draw_text_box(summary, margin, content_width, style, BOLD_FONT, Align::Left);
            self.cursor += style.height;
        }

        if let Some(footer) = &page.footer {
            let style = report.footer_style;
            self.cursor = report.page_format.height - margin - style.height;
            self.draw_text_box(footer, margin, content_width, style, REGULAR_FONT, Align::Center);
        }

        self.content
    }

    fn table_width(&self) -> f32 {
        self.report.columns.iter().map(|c| c.width).sum()
    }

    fn draw_column_header(&mut self) {
        let report = self.report;
        let style = report.header_style;
        let margin = report.page_format.margin;

        self.fill_rect(margin, self.cursor, self.table_width(), style.height, HEADER_SHADE);
        let mut x = margin;
        for column in &report.columns {
            self.draw_text_box(&column.header, x, column.width, style, BOLD_FONT, column.align);
            x += column.width;
        }
        self.cursor += style.height;
    }

    fn draw_row(&mut self, row: &[Cell]) {
        let report = self.report;
        let style = report.detail_style;
        let mut x = report.page_format.margin;
        for (column, cell) in report.columns.iter().zip(row) {
            let text = cell.to_string();
            self.draw_text_box(&text, x, column.width, style, REGULAR_FONT, column.align);
            x += column.width;
        }
        self.cursor += style.height;
    }

    /// Draws one line of text inside a box starting at the current cursor.
    fn draw_text_box(
        &mut self,
        text: &str,
        x: f32,
        width: f32,
        style: BandStyle,
        font: &'static str,
        align: Align,
    ) {
        if text.trim().is_empty() {
            return;
        }
        let available = (width - 2.0 * CELL_PADDING).max(0.0);
        let fitted = fit_text(text, style.font_size, available);
        let measured = text_width(&fitted, style.font_size);
        let text_x = match align {
            Align::Left => x + CELL_PADDING,
            Align::Right => x + width - CELL_PADDING - measured,
            Align::Center => x + (width - measured) / 2.0,
        };
        // Vertically centre the cap height inside the band.
        let baseline = self.cursor + (style.height + style.font_size * 0.7) / 2.0;
        let pdf_y = self.report.page_format.height - baseline;

        self.push("BT", vec![]);
        self.set_font(font, style.font_size);
        self.set_fill_gray(0.0);
        self.push("Td", vec![text_x.into(), pdf_y.into()]);
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(&fitted), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, gray: f32) {
        let y = self.report.page_format.height - (top + height);
        self.set_fill_gray(gray);
        self.push("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.push("f", vec![]);
    }

    fn draw_rule(&mut self, top: f32) {
        let margin = self.report.page_format.margin;
        let y = self.report.page_format.height - top;
        self.push("w", vec![0.5_f32.into()]);
        self.push("G", vec![RULE_GRAY.into()]);
        self.push("m", vec![margin.into(), y.into()]);
        self.push("l", vec![(margin + self.table_width()).into(), y.into()]);
        self.push("S", vec![]);
    }

    fn set_font(&mut self, font: &'static str, size: f32) {
        if self.state.font_name != font || self.state.font_size != size {
            self.push(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), size.into()],
            );
            self.state.font_name = font;
            self.state.font_size = size;
        }
    }

    fn set_fill_gray(&mut self, gray: f32) {
        if self.state.fill_gray != Some(gray) {
            self.push("g", vec![gray.into()]);
            self.state.fill_gray = Some(gray);
        }
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }
}
