//! Dot-delimited addressing of values inside a nested contract record.
//!
//! A [`FieldPath`] is validated once when it is parsed, so the accessors below only
//! have to deal with the shape of the record they walk. Reads never fail: a missing
//! key anywhere along the way yields `None`. Writes materialise absent intermediate
//! objects and refuse to descend into primitives.

use std::{fmt, str::FromStr};

use serde_json::{Map, Value};

use crate::errors::{FormError, Result};

const SEPARATOR: char = '.';

/// A parsed, non-empty sequence of keys.
///
/// Numeric segments address elements of a sequence, e.g. `royaltyInfo.0.startDate`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(FormError::malformed(raw, "path is empty"));
        }
        let segments: Vec<String> = raw.split(SEPARATOR).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(|segment| segment.trim().is_empty()) {
            return Err(FormError::malformed(
                raw,
                format!("segment {} is empty", position + 1),
            ));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment, which names the record section the path lives in.
    pub fn section(&self) -> &str {
        &self.segments[0]
    }

    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    pub fn child(&self, key: &str) -> Result<Self> {
        Self::parse(&format!("{}{}{}", self.raw, SEPARATOR, key))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        let segments = self.segments[..self.segments.len() - 1].to_vec();
        Some(Self {
            raw: segments.join("."),
            segments,
        })
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Resolves `path` inside `record`, returning `None` when any key along the way is absent.
pub fn get<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(record, |current, segment| step(current, segment))
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Returns a copy of `record` with `value` stored at `path`; `record` itself is untouched.
pub fn set(record: &Value, path: &FieldPath, value: Value) -> Result<Value> {
    let mut updated = record.clone();
    set_in_place(&mut updated, path, value)?;
    Ok(updated)
}

/// Stores `value` at `path`, creating empty objects for absent intermediate keys.
///
/// Fails when the walk would descend into a primitive or past the end of a sequence.
pub fn set_in_place(record: &mut Value, path: &FieldPath, value: Value) -> Result<()> {
    let (leaf, parents) = path
        .segments()
        .split_last()
        .ok_or_else(|| FormError::malformed(path.as_str(), "path is empty"))?;

    let mut current = record;
    for segment in parents {
        current = descend_or_create(current, segment, path)?;
    }

    match current {
        Value::Object(map) => {
            map.insert(leaf.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = index_slot(items, leaf, path)?;
            *slot = value;
            Ok(())
        }
        other => Err(FormError::malformed(
            path.as_str(),
            format!("cannot assign `{}` inside a {}", leaf, kind_name(other)),
        )),
    }
}

fn descend_or_create<'a>(
    current: &'a mut Value,
    segment: &str,
    path: &FieldPath,
) -> Result<&'a mut Value> {
    match current {
        Value::Object(map) => {
            let next = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if next.is_null() {
                *next = Value::Object(Map::new());
            }
            Ok(next)
        }
        Value::Array(items) => index_slot(items, segment, path),
        other => Err(FormError::malformed(
            path.as_str(),
            format!("cannot descend into a {} at `{}`", kind_name(other), segment),
        )),
    }
}

fn index_slot<'a>(items: &'a mut [Value], segment: &str, path: &FieldPath) -> Result<&'a mut Value> {
    let len = items.len();
    let idx = segment.parse::<usize>().map_err(|_| {
        FormError::malformed(
            path.as_str(),
            format!("`{}` is not an index into a sequence", segment),
        )
    })?;
    items.get_mut(idx).ok_or_else(|| {
        FormError::malformed(
            path.as_str(),
            format!("index {} out of range for a sequence of {}", idx, len),
        )
    })
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).expect("valid path")
    }

    #[test]
    fn rejects_empty_paths_and_segments() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("basicInfo.").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(" .b").is_err());
    }

    #[test]
    fn get_returns_none_for_missing_intermediates() {
        let record = json!({ "basicInfo": { "partyARep": "Wang" } });
        assert_eq!(get(&record, &path("basicInfo.partyARep")), Some(&json!("Wang")));
        assert_eq!(get(&record, &path("basicInfo.missing.deeper")), None);
        assert_eq!(get(&record, &path("basicInfo.partyARep.length")), None);
    }

    #[test]
    fn set_materialises_missing_objects() {
        let record = json!({});
        let updated = set(&record, &path("scopeInfo.policy.region"), json!("CN")).unwrap();
        assert_eq!(updated, json!({ "scopeInfo": { "policy": { "region": "CN" } } }));
        assert_eq!(record, json!({}));
    }

    #[test]
    fn set_replaces_null_intermediates() {
        let mut record = json!({ "scanFile": null });
        set_in_place(&mut record, &path("scanFile.name"), json!("a.pdf")).unwrap();
        assert_eq!(record, json!({ "scanFile": { "name": "a.pdf" } }));
    }

    #[test]
    fn set_refuses_to_descend_into_primitives() {
        let mut record = json!({ "remarks": "plain" });
        let err = set_in_place(&mut record, &path("remarks.inner"), json!("x")).unwrap_err();
        assert!(matches!(err, FormError::MalformedPath { .. }));
        assert_eq!(record, json!({ "remarks": "plain" }));
    }

    #[test]
    fn sequences_are_addressed_by_index() {
        let mut record = json!({ "royaltyInfo": [{ "startDate": "" }] });
        set_in_place(&mut record, &path("royaltyInfo.0.startDate"), json!("2024-01-01")).unwrap();
        assert_eq!(
            get(&record, &path("royaltyInfo.0.startDate")),
            Some(&json!("2024-01-01"))
        );
        assert!(set_in_place(&mut record, &path("royaltyInfo.3.startDate"), json!("")).is_err());
        assert!(set_in_place(&mut record, &path("royaltyInfo.first"), json!("")).is_err());
    }

    #[test]
    fn writes_are_isolated_from_other_paths() {
        let record = json!({
            "basicInfo": { "contractStartDate": "", "contractEndDate": "2025-12-31" },
            "remarks": "keep"
        });
        let updated = set(&record, &path("basicInfo.contractStartDate"), json!("2024-01-01")).unwrap();
        assert_eq!(updated["basicInfo"]["contractEndDate"], json!("2025-12-31"));
        assert_eq!(updated["remarks"], json!("keep"));
        assert_eq!(get(&updated, &path("basicInfo.contractStartDate")), Some(&json!("2024-01-01")));
    }

    #[test]
    fn parent_and_child_navigate_segments() {
        let p = path("otherClauses.amazon.selected");
        assert_eq!(p.section(), "otherClauses");
        assert_eq!(p.leaf(), "selected");
        assert_eq!(p.parent().unwrap().as_str(), "otherClauses.amazon");
        assert_eq!(p.parent().unwrap().child("details").unwrap().as_str(), "otherClauses.amazon.details");
        assert!(path("remarks").parent().is_none());
    }
}
