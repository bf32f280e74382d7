//! Shared plumbing for the Office Open XML exporters: a zip package builder
//! and a thin element writer over `quick_xml`.

use crate::error::ExportError;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// 1pt in twentieths of a point, the WordprocessingML length unit.
pub(crate) const TWIPS_PER_POINT: f32 = 20.0;
/// 1pt in English Metric Units, the DrawingML length unit.
pub(crate) const EMU_PER_POINT: i64 = 12_700;

pub(crate) const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub(crate) const CONTENT_TYPES_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";
pub(crate) const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const DOC_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A zip archive assembled in memory, one part at a time.
pub(crate) struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl Package {
    pub(crate) fn new() -> Self {
        // A fixed timestamp keeps identical reports byte-identical.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
        }
    }

    pub(crate) fn add(&mut self, path: &str, content: &[u8]) -> Result<(), ExportError> {
        self.zip.start_file(path, self.options)?;
        self.zip.write_all(content)?;
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>, ExportError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

/// Streams XML elements into a byte buffer.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Starts a standalone UTF-8 document.
    pub(crate) fn document() -> Result<Self, ExportError> {
        let mut inner = Writer::new(Vec::new());
        inner.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { inner })
    }

    /// A writer without an XML declaration, for fragments.
    pub(crate) fn fragment() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let mut element = BytesStart::new(name);
        element.extend_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Start(element))?;
        Ok(())
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), ExportError> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let mut element = BytesStart::new(name);
        element.extend_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Writes escaped character data.
    pub(crate) fn text(&mut self, text: &str) -> Result<(), ExportError> {
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<name attrs>text</name>`
    pub(crate) fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), ExportError> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// Writes an OPC relationships part. Each entry is `(id, type, target)`.
pub(crate) fn relationships(entries: &[(&str, &str, &str)]) -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlWriter::document()?;
    xml.start("Relationships", &[("xmlns", RELATIONSHIPS_NS)])?;
    for (id, kind, target) in entries {
        xml.empty(
            "Relationship",
            &[("Id", *id), ("Type", *kind), ("Target", *target)],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// Writes `[Content_Types].xml` with the `rels` and `xml` defaults plus one
/// override per `(part name, content type)`.
pub(crate) fn content_types(overrides: &[(String, &str)]) -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlWriter::document()?;
    xml.start("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part, content_type) in overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", *content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

/// Writes `docProps/core.xml` carrying only the document title.
pub(crate) fn core_properties(title: &str) -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlWriter::document()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ],
    )?;
    xml.text_element("dc:title", &[], title)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

pub(crate) const CORE_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const CORE_PROPERTIES_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_package_round_trip() {
        let mut package = Package::new();
        package.add("a/b.xml", b"<x/>").unwrap();
        let bytes = package.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("a/b.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<x/>");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut xml = XmlWriter::fragment();
        xml.text_element("t", &[("a", "x\"y")], "<b> & c").unwrap();
        let out = String::from_utf8(xml.finish()).unwrap();
        assert_eq!(out, "<t a=\"x&quot;y\">&lt;b&gt; &amp; c</t>");
    }

    #[test]
    fn test_packages_are_deterministic() {
        let build = || {
            let mut package = Package::new();
            package.add("doc.xml", b"<doc/>").unwrap();
            package.finish().unwrap()
        };
        assert_eq!(build(), build());
    }
}
