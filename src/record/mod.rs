//! Contract record model, path accessor, templates, and the typed shapes of the
//! nested sequences (royalty schedule, remittance entries, embargo rules, contacts).

pub mod path;
pub mod remittance;
pub mod royalty;
pub mod rows;
pub mod samples;
pub mod template;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FormError, Result};

pub use path::FieldPath;
pub use remittance::{AccountType, RemittanceEntry};
pub use royalty::{DateScheme, RoyaltySplit, VolumeFormat, VolumeIdentifier, VolumeRule};
pub use rows::{ContactRow, EmbargoRule};

/// The two organisational lines, each with its own record shape and field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractLine {
    Academic,
    LibraryServices,
}

impl ContractLine {
    pub const ALL: [ContractLine; 2] = [ContractLine::Academic, ContractLine::LibraryServices];

    pub fn slug(self) -> &'static str {
        match self {
            ContractLine::Academic => "academic",
            ContractLine::LibraryServices => "library-services",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "academic" => Some(ContractLine::Academic),
            "library-services" | "library" => Some(ContractLine::LibraryServices),
            _ => None,
        }
    }

    /// Path of the business key used to look records up for import.
    pub fn import_key_path(self) -> &'static str {
        match self {
            ContractLine::Academic => "registrationInfo.managementNo",
            ContractLine::LibraryServices => "registrationInfo.airitiContractNo",
        }
    }
}

impl fmt::Display for ContractLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContractLine::Academic => "Academic",
            ContractLine::LibraryServices => "Library Services",
        };
        f.write_str(label)
    }
}

/// A single contract, stored as one tree of named sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub line: ContractLine,
    pub data: Value,
}

impl ContractRecord {
    pub fn new(line: ContractLine, data: Value) -> Result<Self> {
        if !data.is_object() {
            return Err(FormError::invalid_value(
                "<root>",
                format!("record root must be a record, found a {}", path::kind_name(&data)),
            ));
        }
        Ok(Self { line, data })
    }

    /// A blank record for the given line.
    pub fn blank(line: ContractLine) -> Self {
        Self {
            line,
            data: template::blank(line),
        }
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path::get(&self.data, path)
    }

    /// String view of a leaf; absent and non-string values read as `""`.
    pub fn text(&self, path: &FieldPath) -> &str {
        self.get(path).and_then(Value::as_str).unwrap_or("")
    }

    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        path::set_in_place(&mut self.data, path, value)
    }

    /// Copy-on-write variant of [`ContractRecord::set`].
    pub fn with(&self, path: &FieldPath, value: Value) -> Result<Self> {
        Ok(Self {
            line: self.line,
            data: path::set(&self.data, path, value)?,
        })
    }

    /// Deserialises the subtree at `path` into a typed shape.
    pub fn typed<T: serde::de::DeserializeOwned>(&self, path: &FieldPath) -> Result<T> {
        let value = self.get(path).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|err| FormError::invalid_value(path.as_str(), err.to_string()))
    }

    /// Serialises `value` and stores it at `path`.
    pub fn set_typed<T: Serialize>(&mut self, path: &FieldPath, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|err| FormError::invalid_value(path.as_str(), err.to_string()))?;
        self.set(path, value)
    }
}

/// Parses a path built into the crate's catalogs and composites.
///
/// A malformed built-in path is a programming error and fails immediately.
pub(crate) fn literal_path(raw: &str) -> FieldPath {
    match FieldPath::parse(raw) {
        Ok(path) => path,
        Err(err) => panic!("built-in path `{raw}` is malformed: {err}"),
    }
}
