use lopdf::content::Content;
use lopdf::{Document, Object};
use std::io::{Cursor, Read};

/// Literal strings shown with `Tj`, page by page.
pub fn pdf_strings(bytes: &[u8]) -> Result<Vec<Vec<String>>, Box<dyn std::error::Error>> {
    let doc = Document::load_mem(bytes)?;
    let mut pages = Vec::new();
    for page_id in doc.get_pages().into_values() {
        let content = Content::decode(&doc.get_page_content(page_id)?)?;
        let strings = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
                _ => None,
            })
            .collect();
        pages.push(strings);
    }
    Ok(pages)
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
