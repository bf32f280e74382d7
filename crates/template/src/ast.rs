//! Serde model of the JSON template file, before validation.

use inventory_types::{Align, PageFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateFile {
    pub name: String,
    #[serde(default)]
    pub page: PageFormat,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub title: Option<TextBandDef>,
    #[serde(default)]
    pub column_header: Option<BandDef>,
    #[serde(default)]
    pub detail: Option<BandDef>,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub page_footer: Option<TextBandDef>,
    #[serde(default)]
    pub summary: Option<TextBandDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Integer,
    Decimal,
    Boolean,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ParameterType,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
}

/// A band with no text of its own (column header, detail).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BandDef {
    pub height: Option<f32>,
    pub font_size: Option<f32>,
}

/// A band printing one text expression (title, page footer, summary).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextBandDef {
    pub text: String,
    pub height: Option<f32>,
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    pub header: String,
    pub field: String,
    pub width: f32,
    #[serde(default)]
    pub align: Align,
    pub decimals: Option<u8>,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
        })
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Decimal => "decimal",
            ParameterType::Boolean => "boolean",
        })
    }
}
