//! Required-field validation.

use serde_json::Value;

use crate::catalog::RequiredRule;
use crate::record::{ContractRecord, FieldPath};

/// A required field that currently has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub path: FieldPath,
    pub label: String,
}

/// Every rule whose value is missing, in rule declaration order.
pub fn validate(record: &ContractRecord, rules: &[RequiredRule]) -> Vec<MissingField> {
    rules
        .iter()
        .filter(|rule| is_blank(record.get(&rule.path)))
        .map(|rule| MissingField {
            path: rule.path.clone(),
            label: rule.label.clone(),
        })
        .collect()
}

/// Absent values, nulls, whitespace-only strings and empty containers count as blank.
///
/// This is stricter than a plain falsy check, which would accept `[]` and `{}`:
/// a required tag list with no tags is reported as missing.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}

pub fn labels(missing: &[MissingField]) -> Vec<&str> {
    missing.iter().map(|field| field.label.as_str()).collect()
}
