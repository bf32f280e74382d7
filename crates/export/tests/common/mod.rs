#![allow(dead_code)]

use inventory_types::{Align, BandStyle, Cell, ColumnLayout, FilledPage, FilledReport, PageFormat};
use std::io::{Cursor, Read};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn item_row(name: &str, quantity: i64, price: f64) -> Vec<Cell> {
    vec![
        Cell::Text(name.to_string()),
        Cell::Integer(quantity),
        Cell::Decimal {
            value: price,
            scale: Some(2),
        },
    ]
}

pub fn sample_rows() -> Vec<Vec<Cell>> {
    vec![
        item_row("Apple", 3, 1.50),
        item_row("Banana", 5, 0.80),
        item_row("Orange", 2, 1.20),
        item_row("Mango", 4, 2.30),
    ]
}

/// A report laid out like the bundled inventory template, with the given
/// rows split into pages.
pub fn report_with_pages(pages: Vec<Vec<Vec<Cell>>>) -> FilledReport {
    let count = pages.len().max(1);
    let total: usize = pages.iter().map(Vec::len).sum();
    let mut filled: Vec<FilledPage> = pages
        .into_iter()
        .enumerate()
        .map(|(i, rows)| FilledPage {
            number: i + 1,
            title: (i == 0).then(|| "Sales Inventory Report".to_string()),
            rows,
            footer: Some(format!("Page {} of {}", i + 1, count)),
            summary: None,
        })
        .collect();
    if filled.is_empty() {
        filled.push(FilledPage {
            number: 1,
            title: Some("Sales Inventory Report".to_string()),
            rows: Vec::new(),
            footer: Some("Page 1 of 1".to_string()),
            summary: None,
        });
    }
    if let Some(last) = filled.last_mut() {
        last.summary = Some(format!("{} items", total));
    }

    FilledReport {
        name: "inventory".to_string(),
        page_format: PageFormat::default(),
        columns: vec![
            ColumnLayout {
                header: "Name".to_string(),
                width: 240.0,
                align: Align::Left,
            },
            ColumnLayout {
                header: "Quantity".to_string(),
                width: 120.0,
                align: Align::Right,
            },
            ColumnLayout {
                header: "Price".to_string(),
                width: 120.0,
                align: Align::Right,
            },
        ],
        title_style: BandStyle::new(40.0, 18.0),
        header_style: BandStyle::new(22.0, 11.0),
        detail_style: BandStyle::new(18.0, 10.0),
        footer_style: BandStyle::new(20.0, 9.0),
        summary_style: BandStyle::new(24.0, 10.0),
        pages: filled,
    }
}

pub fn sample_report() -> FilledReport {
    report_with_pages(vec![sample_rows()])
}

pub fn zip_entries(bytes: &[u8]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec()))?;
    Ok(archive.file_names().map(str::to_string).collect())
}

pub fn zip_part(bytes: &[u8], name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec()))?;
    let mut content = String::new();
    archive.by_name(name)?.read_to_string(&mut content)?;
    Ok(content)
}
