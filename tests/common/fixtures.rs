use inventory_report::report::EMBEDDED_TEMPLATE;
use inventory_types::Item;
use std::path::Path;
use tempfile::TempDir;

/// A template directory holding a copy of the bundled template at
/// `reports/sample_report.json`.
pub fn template_dir() -> std::io::Result<TempDir> {
    let dir = TempDir::new()?;
    write_template(dir.path(), EMBEDDED_TEMPLATE)?;
    Ok(dir)
}

pub fn write_template(base: &Path, contents: &[u8]) -> std::io::Result<()> {
    let reports = base.join("reports");
    std::fs::create_dir_all(&reports)?;
    std::fs::write(reports.join("sample_report.json"), contents)
}

/// Enough rows to spill over onto a second A4 page.
pub fn many_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| Item::new(format!("Item {:03}", i), i as i32, i as f64 * 0.5))
        .collect()
}
