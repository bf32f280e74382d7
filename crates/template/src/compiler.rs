//! Implements the "Compilation" phase.
//! It transforms the Serde-parsed template into a validated, executable report definition.

use crate::ast::{BandDef, FieldDef, FieldType, ParameterDef, TemplateFile, TextBandDef};
use crate::error::TemplateError;
use handlebars::Handlebars;
use inventory_types::{BandStyle, ColumnLayout, PageFormat};
use std::collections::HashSet;

pub(crate) const TITLE_BAND: &str = "title";
pub(crate) const FOOTER_BAND: &str = "pageFooter";
pub(crate) const SUMMARY_BAND: &str = "summary";

/// Variables the filler supplies to every text band.
pub const BUILTIN_VARIABLES: [&str; 3] = ["REPORT_COUNT", "PAGE_NUMBER", "PAGE_COUNT"];

const DEFAULT_TITLE: BandStyle = BandStyle {
    height: 40.0,
    font_size: 18.0,
};
const DEFAULT_HEADER: BandStyle = BandStyle {
    height: 22.0,
    font_size: 11.0,
};
const DEFAULT_DETAIL: BandStyle = BandStyle {
    height: 18.0,
    font_size: 10.0,
};
const DEFAULT_FOOTER: BandStyle = BandStyle {
    height: 20.0,
    font_size: 9.0,
};
const DEFAULT_SUMMARY: BandStyle = BandStyle {
    height: 24.0,
    font_size: 10.0,
};

/// A column bound to the index of the field it prints.
#[derive(Debug, Clone)]
pub(crate) struct CompiledColumn {
    pub layout: ColumnLayout,
    pub field_index: usize,
    pub decimals: Option<u8>,
}

/// A validated, reusable report definition. Holds no data.
///
/// Compiling the same template bytes always yields an equivalent definition,
/// so instances may be cached and shared across threads.
#[derive(Debug, Clone)]
pub struct CompiledReport {
    pub(crate) name: String,
    pub(crate) page_format: PageFormat,
    pub(crate) parameters: Vec<ParameterDef>,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) columns: Vec<CompiledColumn>,
    pub(crate) title_style: BandStyle,
    pub(crate) header_style: BandStyle,
    pub(crate) detail_style: BandStyle,
    pub(crate) footer_style: BandStyle,
    pub(crate) summary_style: BandStyle,
    pub(crate) registry: Handlebars<'static>,
}

impl CompiledReport {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_format(&self) -> PageFormat {
        self.page_format
    }

    pub fn parameters(&self) -> &[ParameterDef] {
        &self.parameters
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnLayout> {
        self.columns.iter().map(|c| &c.layout)
    }

    pub fn has_title(&self) -> bool {
        self.registry.has_template(TITLE_BAND)
    }

    pub fn has_page_footer(&self) -> bool {
        self.registry.has_template(FOOTER_BAND)
    }

    pub fn has_summary(&self) -> bool {
        self.registry.has_template(SUMMARY_BAND)
    }
}

/// Compiles JSON template sources into [`CompiledReport`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportCompiler;

impl ReportCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, source: &[u8]) -> Result<CompiledReport, TemplateError> {
        let text = std::str::from_utf8(source)
            .map_err(|e| TemplateError::Compile(format!("template is not valid UTF-8: {}", e)))?;
        let file: TemplateFile = serde_json::from_str(text)?;
        let report = self.compile_file(file)?;
        log::debug!(
            "Compiled report '{}' ({} columns, {} parameters)",
            report.name,
            report.columns.len(),
            report.parameters.len()
        );
        Ok(report)
    }

    pub fn compile_file(&self, file: TemplateFile) -> Result<CompiledReport, TemplateError> {
        if file.name.trim().is_empty() {
            return Err(compile_err("template name must not be empty"));
        }
        if file.columns.is_empty() {
            return Err(compile_err("template declares no columns"));
        }
        check_unique("field", file.fields.iter().map(|f| f.name.as_str()))?;
        check_unique("parameter", file.parameters.iter().map(|p| p.name.as_str()))?;
        for builtin in BUILTIN_VARIABLES {
            if file.parameters.iter().any(|p| p.name == builtin) {
                return Err(compile_err(format!(
                    "parameter '{}' shadows a built-in variable",
                    builtin
                )));
            }
        }

        let page = file.page;
        if page.width <= 0.0 || page.height <= 0.0 || page.margin < 0.0 {
            return Err(compile_err("page dimensions must be positive"));
        }

        let columns = file
            .columns
            .iter()
            .map(|column| -> Result<CompiledColumn, TemplateError> {
                let field_index = file
                    .fields
                    .iter()
                    .position(|f| f.name == column.field)
                    .ok_or_else(|| {
                        compile_err(format!(
                            "column '{}' refers to undeclared field '{}'",
                            column.header, column.field
                        ))
                    })?;
                if column.width <= 0.0 {
                    return Err(compile_err(format!(
                        "column '{}' must have a positive width",
                        column.header
                    )));
                }
                if column.decimals.is_some() && file.fields[field_index].kind != FieldType::Decimal
                {
                    return Err(compile_err(format!(
                        "column '{}' sets decimals on non-decimal field '{}'",
                        column.header, column.field
                    )));
                }
                Ok(CompiledColumn {
                    layout: ColumnLayout {
                        header: column.header.clone(),
                        width: column.width,
                        align: column.align,
                    },
                    field_index,
                    decimals: column.decimals,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_width: f32 = columns.iter().map(|c| c.layout.width).sum();
        if total_width > page.content_size().width {
            log::warn!(
                "Columns of report '{}' are {}pt wide but the page only has {}pt",
                file.name,
                total_width,
                page.content_size().width
            );
        }

        let title_style = text_band_style("title", file.title.as_ref(), DEFAULT_TITLE)?;
        let header_style = band_style("columnHeader", file.column_header.as_ref(), DEFAULT_HEADER)?;
        let detail_style = band_style("detail", file.detail.as_ref(), DEFAULT_DETAIL)?;
        let footer_style = text_band_style("pageFooter", file.page_footer.as_ref(), DEFAULT_FOOTER)?;
        let summary_style = text_band_style("summary", file.summary.as_ref(), DEFAULT_SUMMARY)?;

        let content_height = page.content_size().height;
        let title_height = file.title.as_ref().map_or(0.0, |_| title_style.height);
        let footer_height = file.page_footer.as_ref().map_or(0.0, |_| footer_style.height);
        let first_page_need =
            title_height + header_style.height + footer_height + detail_style.height;
        if first_page_need > content_height {
            return Err(compile_err(format!(
                "page content height {}pt cannot hold title, header, footer and one detail row ({}pt)",
                content_height, first_page_need
            )));
        }
        if file.summary.is_some()
            && header_style.height + footer_height + summary_style.height > content_height
        {
            return Err(compile_err(
                "summary band does not fit on a page with the column header and footer",
            ));
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // Exporters escape for their own output format
        registry.register_escape_fn(handlebars::no_escape);

        let known: HashSet<&str> = file
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .chain(BUILTIN_VARIABLES)
            .collect();
        for (band_name, band) in [
            (TITLE_BAND, &file.title),
            (FOOTER_BAND, &file.page_footer),
            (SUMMARY_BAND, &file.summary),
        ] {
            if let Some(band) = band {
                check_placeholders(band_name, &band.text, &known)?;
                registry
                    .register_template_string(band_name, &band.text)
                    .map_err(|e| {
                        compile_err(format!("invalid {} expression: {}", band_name, e))
                    })?;
            }
        }

        Ok(CompiledReport {
            name: file.name,
            page_format: page,
            parameters: file.parameters,
            fields: file.fields,
            columns,
            title_style,
            header_style,
            detail_style,
            footer_style,
            summary_style,
            registry,
        })
    }
}

fn compile_err(message: impl Into<String>) -> TemplateError {
    TemplateError::Compile(message.into())
}

fn check_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), TemplateError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(compile_err(format!("{} name must not be empty", kind)));
        }
        if !seen.insert(name) {
            return Err(compile_err(format!("duplicate {} '{}'", kind, name)));
        }
    }
    Ok(())
}

fn band_style(
    band: &str,
    def: Option<&BandDef>,
    default: BandStyle,
) -> Result<BandStyle, TemplateError> {
    let style = BandStyle::new(
        def.and_then(|d| d.height).unwrap_or(default.height),
        def.and_then(|d| d.font_size).unwrap_or(default.font_size),
    );
    validate_style(band, style)
}

fn text_band_style(
    band: &str,
    def: Option<&TextBandDef>,
    default: BandStyle,
) -> Result<BandStyle, TemplateError> {
    let style = BandStyle::new(
        def.and_then(|d| d.height).unwrap_or(default.height),
        def.and_then(|d| d.font_size).unwrap_or(default.font_size),
    );
    validate_style(band, style)
}

fn validate_style(band: &str, style: BandStyle) -> Result<BandStyle, TemplateError> {
    if style.height <= 0.0 || style.font_size <= 0.0 {
        return Err(compile_err(format!(
            "{} band needs a positive height and font size",
            band
        )));
    }
    Ok(style)
}

/// Checks that every plain `{{name}}` placeholder names a parameter or a
/// built-in variable.
///
/// Keywords (`else`, `this`, `@…`) are skipped, and so is everything inside
/// blocks that change the context (`each`, `with`, custom helpers). Helper
/// calls are left to Handlebars.
fn check_placeholders(band: &str, text: &str, known: &HashSet<&str>) -> Result<(), TemplateError> {
    let mut blocks: Vec<&str> = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| compile_err(format!("unclosed {{{{ expression in {} band", band)))?;
        let inner = after[..end]
            .trim_start_matches('{')
            .trim_matches('~')
            .trim();
        rest = after[end + 2..].trim_start_matches('}');

        if let Some(open) = inner.strip_prefix('#').or_else(|| inner.strip_prefix('^'))
            && !open.is_empty()
        {
            blocks.push(open.split_whitespace().next().unwrap_or_default());
            continue;
        }
        if inner.starts_with('/') {
            blocks.pop();
            continue;
        }
        if matches!(inner, "else" | "this" | "^") || inner.starts_with("else ") {
            continue;
        }
        let context_unchanged = blocks.iter().all(|b| matches!(*b, "if" | "unless"));
        let is_plain = !inner.is_empty()
            && inner
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if context_unchanged && is_plain && !known.contains(inner) {
            return Err(compile_err(format!(
                "{} band refers to unknown variable '{}'",
                band, inner
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> serde_json::Value {
        json!({
            "name": "inventory",
            "parameters": [{ "name": "reportTitle", "type": "string", "required": true }],
            "fields": [
                { "name": "name", "type": "string" },
                { "name": "quantity", "type": "integer" },
                { "name": "price", "type": "decimal" }
            ],
            "title": { "text": "{{reportTitle}}" },
            "columns": [
                { "header": "Item", "field": "name", "width": 200.0 },
                { "header": "Qty", "field": "quantity", "width": 100.0, "align": "right" },
                { "header": "Price", "field": "price", "width": 100.0, "decimals": 2 }
            ],
            "pageFooter": { "text": "Page {{PAGE_NUMBER}} of {{PAGE_COUNT}}" }
        })
    }

    fn compile(value: &serde_json::Value) -> Result<CompiledReport, TemplateError> {
        ReportCompiler::new().compile(value.to_string().as_bytes())
    }

    #[test]
    fn test_compile_valid_template() {
        let report = compile(&template()).unwrap();
        assert_eq!(report.name(), "inventory");
        assert_eq!(report.columns().count(), 3);
        assert!(report.has_title());
        assert!(report.has_page_footer());
        assert!(!report.has_summary());
        assert_eq!(report.detail_style, DEFAULT_DETAIL);
        assert_eq!(report.page_format(), PageFormat::default());
    }

    #[test]
    fn test_invalid_json_is_compile_error() {
        let result = ReportCompiler::new().compile(b"{ not json");
        assert!(matches!(result, Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_invalid_utf8_is_compile_error() {
        let result = ReportCompiler::new().compile(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_unknown_column_field_rejected() {
        let mut t = template();
        t["columns"][0]["field"] = json!("sku");
        let err = compile(&t).unwrap_err();
        assert!(err.to_string().contains("undeclared field 'sku'"));
    }

    #[test]
    fn test_empty_columns_rejected() {
        let mut t = template();
        t["columns"] = json!([]);
        assert!(matches!(compile(&t), Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_decimals_on_integer_field_rejected() {
        let mut t = template();
        t["columns"][1]["decimals"] = json!(2);
        assert!(matches!(compile(&t), Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let mut t = template();
        t["title"]["text"] = json!("{{reportSubtitle}}");
        let err = compile(&t).unwrap_err();
        assert!(err.to_string().contains("reportSubtitle"));
    }

    #[test]
    fn test_handlebars_keywords_are_not_variables() {
        let mut t = template();
        t["title"]["text"] =
            json!("{{#if reportTitle}}{{reportTitle}}{{else}}Untitled{{/if}}");
        t["pageFooter"]["text"] = json!("{{~PAGE_NUMBER~}} / {{{PAGE_COUNT}}} {{@root.PAGE_COUNT}}");
        assert!(compile(&t).is_ok());

        t["title"]["text"] = json!("{{#with reportTitle}}{{this}} {{length}}{{/with}}");
        assert!(compile(&t).is_ok());
    }

    #[test]
    fn test_unknown_variable_inside_if_block_rejected() {
        let mut t = template();
        t["title"]["text"] = json!("{{#if reportTitle}}{{subtitle}}{{else}}Untitled{{/if}}");
        let err = compile(&t).unwrap_err();
        assert!(err.to_string().contains("'subtitle'"));
    }

    #[test]
    fn test_unclosed_expression_rejected() {
        let mut t = template();
        t["title"]["text"] = json!("Report {{reportTitle");
        assert!(matches!(compile(&t), Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut t = template();
        t["fields"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "name": "name", "type": "string" }));
        assert!(matches!(compile(&t), Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_page_too_small_rejected() {
        let mut t = template();
        t["page"] = json!({ "width": 300.0, "height": 100.0, "margin": 20.0 });
        let err = compile(&t).unwrap_err();
        assert!(err.to_string().contains("cannot hold"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut t = template();
        t["colums"] = json!([]);
        assert!(matches!(compile(&t), Err(TemplateError::Compile(_))));
    }
}
