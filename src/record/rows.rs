//! Row types for the small editable lists embedded in a record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delays listing of the contracted title on one target for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbargoRule {
    pub id: Uuid,
    pub target: String,
    pub period: String,
}

impl EmbargoRule {
    pub fn new(target: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target: target.into(),
            period: period.into(),
        }
    }
}

/// A publisher contact on a library-services contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    pub id: Uuid,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactRow {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            info: String::new(),
            title: Vec::new(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

impl Default for ContactRow {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows that can be located by their generated identifier.
pub trait KeyedRow {
    fn row_id(&self) -> Uuid;
}

impl KeyedRow for EmbargoRule {
    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl KeyedRow for ContactRow {
    fn row_id(&self) -> Uuid {
        self.id
    }
}
