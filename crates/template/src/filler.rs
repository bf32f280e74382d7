//! The "Fill" phase: binds parameters and records to a [`CompiledReport`] and
//! paginates the result into a [`FilledReport`].

use crate::ast::{FieldDef, FieldType, ParameterType};
use crate::compiler::{CompiledReport, FOOTER_BAND, SUMMARY_BAND, TITLE_BAND};
use crate::error::TemplateError;
use inventory_types::{Cell, FilledPage, FilledReport};
use serde::Serialize;
use serde_json::{Map, Value};

/// Named values made available to the report's text bands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportParameters(Map<String, Value>);

impl ReportParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// How many detail rows a page holds, and whether the summary lands on it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageSlot {
    rows: usize,
    summary: bool,
}

// Absorbs float error when band heights divide the page exactly
const EPSILON: f32 = 0.001;

impl CompiledReport {
    /// Fills the report. Records are bound in the order given.
    ///
    /// Each record is serialized to a JSON object and every declared field is
    /// read from it, so any `Serialize` type with matching field names works
    /// as a data source.
    pub fn fill<R: Serialize>(
        &self,
        parameters: &ReportParameters,
        records: &[R],
    ) -> Result<FilledReport, TemplateError> {
        let mut context = self.bind_parameters(parameters)?;
        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.bind_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let slots = self.paginate(rows.len());
        let page_count = slots.len();
        context.insert("REPORT_COUNT".into(), rows.len().into());
        context.insert("PAGE_COUNT".into(), page_count.into());

        let mut rows = rows.into_iter();
        let mut pages = Vec::with_capacity(page_count);
        for (index, slot) in slots.into_iter().enumerate() {
            let number = index + 1;
            context.insert("PAGE_NUMBER".into(), number.into());

            let title = if number == 1 && self.has_title() {
                Some(self.render_band(TITLE_BAND, &context)?)
            } else {
                None
            };
            let footer = if self.has_page_footer() {
                Some(self.render_band(FOOTER_BAND, &context)?)
            } else {
                None
            };
            let summary = if slot.summary {
                Some(self.render_band(SUMMARY_BAND, &context)?)
            } else {
                None
            };

            pages.push(FilledPage {
                number,
                title,
                rows: rows.by_ref().take(slot.rows).collect(),
                footer,
                summary,
            });
        }

        log::debug!(
            "Filled report '{}': {} records on {} pages",
            self.name,
            records.len(),
            page_count
        );

        Ok(FilledReport {
            name: self.name.clone(),
            page_format: self.page_format,
            columns: self.columns().cloned().collect(),
            title_style: self.title_style,
            header_style: self.header_style,
            detail_style: self.detail_style,
            footer_style: self.footer_style,
            summary_style: self.summary_style,
            pages,
        })
    }

    fn bind_parameters(
        &self,
        parameters: &ReportParameters,
    ) -> Result<Map<String, Value>, TemplateError> {
        let mut context = parameters.0.clone();
        for def in &self.parameters {
            match parameters.get(&def.name) {
                None | Some(Value::Null) if def.required => {
                    return Err(TemplateError::Fill(format!(
                        "missing required parameter '{}'",
                        def.name
                    )));
                }
                None => {
                    context.insert(def.name.clone(), Value::Null);
                }
                Some(Value::Null) => {}
                Some(value) if !parameter_matches(def.kind, value) => {
                    return Err(TemplateError::Fill(format!(
                        "parameter '{}' expects a {} value, got {}",
                        def.name,
                        def.kind,
                        json_type(value)
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(context)
    }

    fn bind_record<R: Serialize>(&self, index: usize, record: &R) -> Result<Vec<Cell>, TemplateError> {
        let value = serde_json::to_value(record).map_err(|e| {
            TemplateError::Fill(format!("record {} could not be read: {}", index, e))
        })?;
        let object = value
            .as_object()
            .ok_or_else(|| TemplateError::Fill(format!("record {} is not an object", index)))?;

        let values = self
            .fields
            .iter()
            .map(|field| -> Result<Cell, TemplateError> {
                let raw = object.get(&field.name).ok_or_else(|| {
                    TemplateError::Fill(format!("record {} has no field '{}'", index, field.name))
                })?;
                coerce(index, field, raw)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .columns
            .iter()
            .map(|column| match &values[column.field_index] {
                Cell::Decimal { value, .. } => Cell::Decimal {
                    value: *value,
                    scale: column.decimals,
                },
                other => other.clone(),
            })
            .collect())
    }

    fn paginate(&self, row_count: usize) -> Vec<PageSlot> {
        let content_height = self.page_format.content_size().height;
        let footer_height = if self.has_page_footer() {
            self.footer_style.height
        } else {
            0.0
        };
        let row_height = self.detail_style.height;

        let mut slots = Vec::new();
        let mut placed = 0;
        loop {
            let title_height = if slots.is_empty() && self.has_title() {
                self.title_style.height
            } else {
                0.0
            };
            let mut available =
                content_height - footer_height - self.header_style.height - title_height;
            // The compiler guarantees one row fits on the first page
            let capacity = (((available + EPSILON) / row_height).floor() as usize).max(1);
            let rows = capacity.min(row_count - placed);
            placed += rows;
            available -= rows as f32 * row_height;

            if placed < row_count {
                slots.push(PageSlot {
                    rows,
                    summary: false,
                });
                continue;
            }

            if !self.has_summary() {
                slots.push(PageSlot {
                    rows,
                    summary: false,
                });
            } else if available + EPSILON >= self.summary_style.height {
                slots.push(PageSlot {
                    rows,
                    summary: true,
                });
            } else {
                slots.push(PageSlot {
                    rows,
                    summary: false,
                });
                slots.push(PageSlot {
                    rows: 0,
                    summary: true,
                });
            }
            return slots;
        }
    }

    fn render_band(&self, band: &str, context: &Map<String, Value>) -> Result<String, TemplateError> {
        self.registry
            .render(band, context)
            .map_err(|e| TemplateError::Fill(format!("{} band: {}", band, e)))
    }
}

fn coerce(index: usize, field: &FieldDef, raw: &Value) -> Result<Cell, TemplateError> {
    let cell = match (field.kind, raw) {
        (_, Value::Null) => Some(Cell::Empty),
        (FieldType::String, Value::String(s)) => Some(Cell::Text(s.clone())),
        (FieldType::Integer, Value::Number(n)) => n.as_i64().map(Cell::Integer),
        (FieldType::Decimal, Value::Number(n)) => n.as_f64().map(|value| Cell::Decimal {
            value,
            scale: None,
        }),
        _ => None,
    };
    cell.ok_or_else(|| {
        TemplateError::Fill(format!(
            "record {} field '{}' expects a {} value, got {}",
            index,
            field.name,
            field.kind,
            json_type(raw)
        ))
    })
}

fn parameter_matches(kind: ParameterType, value: &Value) -> bool {
    match kind {
        ParameterType::String => value.is_string(),
        ParameterType::Integer => value.is_i64() || value.is_u64(),
        ParameterType::Decimal => value.is_number(),
        ParameterType::Boolean => value.is_boolean(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "decimal",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ReportCompiler;
    use inventory_types::Item;
    use serde_json::json;

    fn base_template() -> Value {
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
            "pageFooter": { "text": "Page {{PAGE_NUMBER}} of {{PAGE_COUNT}}" },
            "summary": { "text": "{{REPORT_COUNT}} items" }
        })
    }

    /// 200pt tall page without margin: 6 rows on page one, 8 on later pages.
    fn small_page_template() -> Value {
        let mut t = base_template();
        t["page"] = json!({ "width": 400.0, "height": 200.0, "margin": 0.0 });
        t["title"]["height"] = json!(40.0);
        t["columnHeader"] = json!({ "height": 20.0 });
        t["detail"] = json!({ "height": 20.0 });
        t["pageFooter"]["height"] = json!(20.0);
        t["summary"]["height"] = json!(30.0);
        t
    }

    fn compile(t: &Value) -> CompiledReport {
        ReportCompiler::new().compile(t.to_string().as_bytes()).unwrap()
    }

    fn params() -> ReportParameters {
        ReportParameters::new().with("reportTitle", "Sales Inventory Report")
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("Item {}", i), i as i32, 0.5))
            .collect()
    }

    #[test]
    fn test_fill_sample_items() {
        let report = compile(&base_template())
            .fill(&params(), &Item::sample_set())
            .unwrap();

        assert_eq!(report.page_count(), 1);
        assert_eq!(report.title(), Some("Sales Inventory Report"));
        assert_eq!(report.summary(), Some("4 items"));
        assert_eq!(report.pages[0].footer.as_deref(), Some("Page 1 of 1"));

        let first: Vec<String> = report.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(first, ["Apple", "3", "1.50"]);
    }

    #[test]
    fn test_fill_preserves_input_order() {
        let mut records = Item::sample_set();
        records.reverse();
        let report = compile(&base_template()).fill(&params(), &records).unwrap();
        let names: Vec<String> = report.rows().map(|r| r[0].to_string()).collect();
        assert_eq!(names, ["Mango", "Orange", "Banana", "Apple"]);
    }

    #[test]
    fn test_fill_empty_records() {
        let report = compile(&base_template())
            .fill::<Item>(&params(), &[])
            .unwrap();
        assert_eq!(report.page_count(), 1);
        assert_eq!(report.row_count(), 0);
        assert_eq!(report.summary(), Some("0 items"));
    }

    #[test]
    fn test_missing_required_parameter() {
        let err = compile(&base_template())
            .fill(&ReportParameters::new(), &Item::sample_set())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Fill(ref m) if m.contains("reportTitle")));
    }

    #[test]
    fn test_parameter_type_mismatch() {
        let err = compile(&base_template())
            .fill(&ReportParameters::new().with("reportTitle", 42), &Item::sample_set())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Fill(_)));
    }

    #[test]
    fn test_field_type_mismatch_names_record() {
        let records = vec![
            json!({ "name": "Apple", "quantity": 3, "price": 1.5 }),
            json!({ "name": "Pear", "quantity": "many", "price": 1.0 }),
        ];
        let err = compile(&base_template())
            .fill(&params(), &records)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("record 1"), "{}", message);
        assert!(message.contains("quantity"), "{}", message);
    }

    #[test]
    fn test_missing_field() {
        let records = vec![json!({ "name": "Apple", "price": 1.5 })];
        let err = compile(&base_template()).fill(&params(), &records).unwrap_err();
        assert!(err.to_string().contains("no field 'quantity'"));
    }

    #[test]
    fn test_decimal_field_rejects_fraction_as_integer() {
        let records = vec![json!({ "name": "Apple", "quantity": 2.5, "price": 1.5 })];
        assert!(compile(&base_template()).fill(&params(), &records).is_err());
    }

    #[test]
    fn test_null_field_is_empty_cell() {
        let records = vec![json!({ "name": null, "quantity": 1, "price": 1 })];
        let report = compile(&base_template()).fill(&params(), &records).unwrap();
        let row = report.rows().next().unwrap();
        assert_eq!(row[0], Cell::Empty);
        assert_eq!(row[2].to_string(), "1.00");
    }

    #[test]
    fn test_pagination_title_only_on_first_page() {
        let report = compile(&small_page_template())
            .fill(&params(), &items(12))
            .unwrap();

        let sizes: Vec<usize> = report.pages.iter().map(|p| p.rows.len()).collect();
        assert_eq!(sizes, [6, 6]);
        assert!(report.pages[0].title.is_some());
        assert!(report.pages[1].title.is_none());
        assert_eq!(report.pages[0].footer.as_deref(), Some("Page 1 of 2"));
        assert_eq!(report.pages[1].footer.as_deref(), Some("Page 2 of 2"));
    }

    #[test]
    fn test_summary_moves_to_new_page_when_full() {
        let report = compile(&small_page_template())
            .fill(&params(), &items(22))
            .unwrap();

        let sizes: Vec<usize> = report.pages.iter().map(|p| p.rows.len()).collect();
        assert_eq!(sizes, [6, 8, 8, 0]);
        assert_eq!(report.pages[3].summary.as_deref(), Some("22 items"));
        assert_eq!(report.pages[3].footer.as_deref(), Some("Page 4 of 4"));

        let names: Vec<String> = report.rows().map(|r| r[0].to_string()).collect();
        let expected: Vec<String> = (0..22).map(|i| format!("Item {}", i)).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_title_with_if_else_falls_back() {
        let mut t = base_template();
        t["title"]["text"] = json!("{{#if reportTitle}}{{reportTitle}}{{else}}Untitled{{/if}}");
        let report = compile(&t);

        let filled = report.fill(&params(), &Item::sample_set()).unwrap();
        assert_eq!(filled.title(), Some("Sales Inventory Report"));

        let blank = ReportParameters::new().with("reportTitle", "");
        let filled = report.fill(&blank, &Item::sample_set()).unwrap();
        assert_eq!(filled.title(), Some("Untitled"));
    }

    #[test]
    fn test_page_variables_in_title_and_summary() {
        let mut t = small_page_template();
        t["title"]["text"] = json!("{{reportTitle}} ({{PAGE_COUNT}} pages)");
        t["summary"]["text"] = json!("{{REPORT_COUNT}} items, ends on page {{PAGE_NUMBER}}");
        let report = compile(&t).fill(&params(), &items(12)).unwrap();

        assert_eq!(report.title(), Some("Sales Inventory Report (2 pages)"));
        assert_eq!(report.summary(), Some("12 items, ends on page 2"));
    }

    #[test]
    fn test_summary_stays_when_room_left() {
        let report = compile(&small_page_template())
            .fill(&params(), &items(8))
            .unwrap();
        let sizes: Vec<usize> = report.pages.iter().map(|p| p.rows.len()).collect();
        assert_eq!(sizes, [6, 2]);
        assert_eq!(report.pages[1].summary.as_deref(), Some("8 items"));
    }
}
