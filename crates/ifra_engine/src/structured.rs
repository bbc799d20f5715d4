use engine_logging::engine_debug;
use ifra_core::{clean_text, ColumnMap, Provenance, RawRecord};
use serde_json::{Map, Value};

use crate::extract::{is_header_label, ExtractedRows};

const LIST_FIELDS: &[&str] = &["data", "items", "results", "rows", "ingredients"];
const KEY_FIELDS: &[&str] = &["cas", "cas_number", "casNumber", "cas_no", "casNo"];
const NAME_FIELDS: &[&str] = &["name", "principal_name", "principalName", "title", "ingredient"];
const CODE_FIELDS: &[&str] = &[
    "ifra_ncs",
    "ncs",
    "ifra_naturals_category",
    "naturals_category",
    "ncs_category",
];
const DESCRIPTION_FIELDS: &[&str] = &["description", "body"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StructuredError {
    #[error("response body is not JSON: {0}")]
    NotJson(String),
    #[error("JSON response holds no record list")]
    NoRecordList,
}

/// Flatten a JSON listing into raw records in `key | name | code | description` order.
pub fn parse_structured(
    body: &str,
    columns: &ColumnMap,
    provenance: &Provenance,
) -> Result<ExtractedRows, StructuredError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| StructuredError::NotJson(err.to_string()))?;
    let items = record_list(&value).ok_or(StructuredError::NoRecordList)?;

    let mut out = ExtractedRows::default();
    for item in items {
        let Some(object) = item.as_object() else {
            out.nameless_dropped += 1;
            continue;
        };
        let fields = object
            .get("attributes")
            .and_then(Value::as_object)
            .unwrap_or(object);

        let cells = vec![
            lookup(fields, KEY_FIELDS),
            lookup(fields, NAME_FIELDS),
            lookup(fields, CODE_FIELDS),
            lookup(fields, DESCRIPTION_FIELDS),
        ];
        let record = RawRecord::new(cells, provenance.clone());
        match columns.name_of(&record) {
            None => out.nameless_dropped += 1,
            Some(name) if is_header_label(name) => out.headers_skipped += 1,
            Some(_) => out.records.push(record),
        }
    }

    engine_debug!("Decoded {} structured records", out.records.len());
    Ok(out)
}

fn record_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => LIST_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_array)),
        _ => None,
    }
}

fn lookup(fields: &Map<String, Value>, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| fields.get(*name).and_then(scalar_text))
        .map(|text| clean_text(&text))
        .unwrap_or_default()
}

/// Strings and numbers as text; Drupal wraps field values as `{"value": ..}` or `[{"value": ..}]`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar_text),
        Value::Array(items) => items.first().and_then(scalar_text),
        _ => None,
    }
}
