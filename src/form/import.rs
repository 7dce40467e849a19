//! Bringing a prior contract into the form as the starting point for a new one.

use serde_json::{json, Value};
use thiserror::Error;

use crate::errors::Result;
use crate::record::{literal_path, path, samples, template, ContractLine, ContractRecord};

/// Recoverable import failures. The store turns these into error notifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Enter the contract number to import")]
    BlankKey,
    #[error("No prior contract found for `{0}`")]
    NotFound(String),
    #[error("Prior contract `{key}` cannot be copied: {reason}")]
    Unreadable { key: String, reason: String },
}

/// Read-only lookup of historical contracts by their business key.
pub trait HistoricalRecords {
    fn find(&self, line: ContractLine, key: &str) -> Option<&ContractRecord>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<ContractRecord>,
}

impl InMemoryHistory {
    pub fn new(records: Vec<ContractRecord>) -> Self {
        Self { records }
    }

    /// The bundled sample contracts for both lines.
    pub fn with_samples() -> Result<Self> {
        Ok(Self::new(samples::historical()?))
    }

    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }
}

impl HistoricalRecords for InMemoryHistory {
    fn find(&self, line: ContractLine, key: &str) -> Option<&ContractRecord> {
        let key_path = literal_path(line.import_key_path());
        self.records
            .iter()
            .find(|record| record.line == line && record.text(&key_path) == key)
    }
}

/// Paths overwritten with their blank-template value on import.
fn reset_paths(line: ContractLine) -> &'static [&'static str] {
    match line {
        ContractLine::Academic => &[
            "id",
            "registrationInfo",
            "basicInfo.contractStartDate",
            "basicInfo.contractEndDate",
        ],
        ContractLine::LibraryServices => &[
            "id",
            "registrationInfo",
            "basicInfo.contractTargetType",
            "basicInfo.contractStartDate",
            "basicInfo.contractEndDate",
        ],
    }
}

/// Copies the prior contract stored under `key` with its identity, contract dates,
/// history and attachment reset. The stored record is never modified.
pub fn import_by_key(
    source: &dyn HistoricalRecords,
    line: ContractLine,
    key: &str,
) -> std::result::Result<ContractRecord, ImportError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ImportError::BlankKey);
    }
    let found = source
        .find(line, key)
        .ok_or_else(|| ImportError::NotFound(key.to_string()))?;

    let blank = template::blank(line);
    let mut copy = found.clone();
    let resets = reset_paths(line).iter().map(|raw| {
        let path = literal_path(raw);
        let value = path::get(&blank, &path).cloned().unwrap_or(Value::Null);
        (path, value)
    });
    let fixed = [
        (literal_path("createdAt"), Value::Null),
        (literal_path("maintenanceHistory"), json!([])),
        (literal_path("scanFile"), Value::Null),
    ];
    for (path, value) in resets.chain(fixed) {
        copy.set(&path, value).map_err(|err| ImportError::Unreadable {
            key: key.to_string(),
            reason: err.to_string(),
        })?;
    }
    Ok(copy)
}
