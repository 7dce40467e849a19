use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;
use crate::record::ContractRecord;

use super::write_atomic;

/// Receives records accepted on submit.
pub trait PersistenceSink {
    fn persist(&mut self, record: &ContractRecord) -> Result<()>;
}

/// Keeps accepted records in memory, in submission order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<ContractRecord>,
}

impl MemorySink {
    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }
}

impl PersistenceSink for MemorySink {
    fn persist(&mut self, record: &ContractRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Writes each accepted record to one JSON file, replacing the previous one.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for JsonFileSink {
    fn persist(&mut self, record: &ContractRecord) -> Result<()> {
        save_record(record, &self.path)?;
        tracing::info!(path = %self.path.display(), "record written");
        Ok(())
    }
}

/// Writes the record to disk atomically by staging to a temporary file.
pub fn save_record(record: &ContractRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_record(path: &Path) -> Result<ContractRecord> {
    let data = fs::read_to_string(path)?;
    let record: ContractRecord = serde_json::from_str(&data)?;
    ContractRecord::new(record.line, record.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContractLine;
    use tempfile::tempdir;

    #[test]
    fn json_sink_round_trips_a_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("contract.json");
        let record = ContractRecord::blank(ContractLine::LibraryServices);

        let mut sink = JsonFileSink::new(&path);
        sink.persist(&record).unwrap();

        assert_eq!(load_record(&path).unwrap(), record);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn loading_rejects_non_object_roots() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"line":"academic","data":[1,2]}"#).unwrap();
        assert!(load_record(&path).is_err());
    }
}
