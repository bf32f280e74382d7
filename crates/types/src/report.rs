//! The filled-report model: a compiled template bound to one parameter set and
//! one record collection, already split into pages.
//!
//! Exporters read this model and never look at the template or the records again.

use crate::geometry::PageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Height and font size of one horizontal band, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStyle {
    pub height: f32,
    pub font_size: f32,
}

impl BandStyle {
    pub fn new(height: f32, font_size: f32) -> Self {
        Self { height, font_size }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub header: String,
    pub width: f32,
    pub align: Align,
}

/// A single typed value in a detail row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    /// `scale` fixes the printed fraction digits when set.
    Decimal { value: f64, scale: Option<u8> },
    Empty,
}

impl Cell {
    /// The numeric value, for exporters that store numbers natively.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Decimal { value, .. } => Some(*value),
            Cell::Text(_) | Cell::Empty => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Decimal {
                value,
                scale: Some(scale),
            } => write!(f, "{:.*}", *scale as usize, value),
            Cell::Decimal { value, scale: None } => write!(f, "{}", value),
            Cell::Empty => Ok(()),
        }
    }
}

/// One output page.
///
/// The column header repeats on every page, so it is not stored per page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledPage {
    /// 1-based.
    pub number: usize,
    /// Only the first page carries the title band.
    pub title: Option<String>,
    pub rows: Vec<Vec<Cell>>,
    pub footer: Option<String>,
    /// Only the page holding the end of the data carries the summary band.
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilledReport {
    pub name: String,
    pub page_format: PageFormat,
    pub columns: Vec<ColumnLayout>,
    pub title_style: BandStyle,
    pub header_style: BandStyle,
    pub detail_style: BandStyle,
    pub footer_style: BandStyle,
    pub summary_style: BandStyle,
    pub pages: Vec<FilledPage>,
}

impl FilledReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All detail rows across pages, in fill order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.pages
            .iter()
            .flat_map(|page| page.rows.iter().map(Vec::as_slice))
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|page| page.rows.len()).sum()
    }

    pub fn title(&self) -> Option<&str> {
        self.pages.first().and_then(|page| page.title.as_deref())
    }

    pub fn summary(&self) -> Option<&str> {
        self.pages.iter().find_map(|page| page.summary.as_deref())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.header.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, rows: Vec<Vec<Cell>>) -> FilledPage {
        FilledPage {
            number,
            title: (number == 1).then(|| "Title".to_string()),
            rows,
            footer: None,
            summary: None,
        }
    }

    #[test]
    fn test_decimal_display_respects_scale() {
        let cell = Cell::Decimal {
            value: 1.5,
            scale: Some(2),
        };
        assert_eq!(cell.to_string(), "1.50");
        let cell = Cell::Decimal {
            value: 0.8,
            scale: None,
        };
        assert_eq!(cell.to_string(), "0.8");
    }

    #[test]
    fn test_numeric_cells() {
        assert_eq!(Cell::Integer(4).as_number(), Some(4.0));
        assert!(!Cell::Text("4".into()).is_numeric());
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_rows_flatten_pages_in_order() {
        let style = BandStyle::new(10.0, 10.0);
        let report = FilledReport {
            name: "r".into(),
            page_format: PageFormat::default(),
            columns: vec![],
            title_style: style,
            header_style: style,
            detail_style: style,
            footer_style: style,
            summary_style: style,
            pages: vec![
                page(1, vec![vec![Cell::Integer(1)], vec![Cell::Integer(2)]]),
                page(2, vec![vec![Cell::Integer(3)]]),
            ],
        };
        let values: Vec<_> = report.rows().map(|r| r[0].clone()).collect();
        assert_eq!(
            values,
            vec![Cell::Integer(1), Cell::Integer(2), Cell::Integer(3)]
        );
        assert_eq!(report.row_count(), 3);
        assert_eq!(report.title(), Some("Title"));
    }
}
