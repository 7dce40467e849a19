//! Bulk-apply over sibling `{selected, details}` fields.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::errors::{FormError, Result};
use crate::record::{ContractRecord, FieldPath};

/// Value a bulk selector can hold. `Cleared` doubles as the indeterminate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkChoice {
    Yes,
    No,
    Other,
    Cleared,
}

impl BulkChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            BulkChoice::Yes => "yes",
            BulkChoice::No => "no",
            BulkChoice::Other => "other",
            BulkChoice::Cleared => "",
        }
    }

    fn from_selected(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(BulkChoice::Yes),
            "no" => Some(BulkChoice::No),
            "other" => Some(BulkChoice::Other),
            _ => None,
        }
    }

    /// Next selector state after clicking `clicked`: clicking the active state clears it.
    pub fn toggled(self, clicked: BulkChoice) -> BulkChoice {
        if self == clicked {
            BulkChoice::Cleared
        } else {
            clicked
        }
    }
}

impl fmt::Display for BulkChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkChoice::Cleared => f.write_str("(mixed)"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for BulkChoice {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim() {
            "" | "clear" | "cleared" => Ok(BulkChoice::Cleared),
            value => BulkChoice::from_selected(value).ok_or_else(|| {
                FormError::invalid_value("<bulk>", format!("`{value}` is not yes, no, other or clear"))
            }),
        }
    }
}

/// Sets `selected` on every target and clears `details` unless the choice is `Other`,
/// in which case existing details are kept.
pub fn apply_bulk(record: &mut ContractRecord, paths: &[FieldPath], choice: BulkChoice) -> Result<()> {
    for path in paths {
        let details = match choice {
            BulkChoice::Other => record
                .get(path)
                .and_then(|value| value.get("details"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            _ => String::new(),
        };
        record.set(path, json!({ "selected": choice.as_str(), "details": details }))?;
    }
    Ok(())
}

/// The shared `selected` value when every target agrees on a non-empty value.
pub fn current_bulk_state(record: &ContractRecord, paths: &[FieldPath]) -> BulkChoice {
    let mut selections = paths.iter().map(|path| {
        record
            .get(path)
            .and_then(|value| value.get("selected"))
            .and_then(Value::as_str)
            .unwrap_or("")
    });
    let Some(first) = selections.next() else {
        return BulkChoice::Cleared;
    };
    match BulkChoice::from_selected(first) {
        Some(choice) if selections.all(|selected| selected == first) => choice,
        _ => BulkChoice::Cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{literal_path, ContractLine};

    fn paths() -> Vec<FieldPath> {
        vec![literal_path("rightsInfo.tts"), literal_path("rightsInfo.trialAccess")]
    }

    fn record() -> ContractRecord {
        ContractRecord::blank(ContractLine::LibraryServices)
    }

    #[test]
    fn apply_clears_details_unless_other() {
        let mut record = record();
        record
            .set(&literal_path("rightsInfo.tts"), json!({ "selected": "other", "details": "note" }))
            .unwrap();

        apply_bulk(&mut record, &paths(), BulkChoice::Other).unwrap();
        assert_eq!(record.text(&literal_path("rightsInfo.tts.details")), "note");
        assert_eq!(record.text(&literal_path("rightsInfo.trialAccess.selected")), "other");

        apply_bulk(&mut record, &paths(), BulkChoice::Yes).unwrap();
        assert_eq!(record.text(&literal_path("rightsInfo.tts.details")), "");
    }

    #[test]
    fn apply_twice_is_the_same_as_once() {
        let mut once = record();
        apply_bulk(&mut once, &paths(), BulkChoice::Yes).unwrap();
        let mut twice = once.clone();
        apply_bulk(&mut twice, &paths(), BulkChoice::Yes).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn state_is_indeterminate_for_empty_or_mixed_targets() {
        let mut record = record();
        assert_eq!(current_bulk_state(&record, &[]), BulkChoice::Cleared);
        assert_eq!(current_bulk_state(&record, &paths()), BulkChoice::Cleared);

        record.set(&literal_path("rightsInfo.tts.selected"), json!("no")).unwrap();
        assert_eq!(current_bulk_state(&record, &paths()), BulkChoice::Cleared);

        record
            .set(&literal_path("rightsInfo.trialAccess.selected"), json!("no"))
            .unwrap();
        assert_eq!(current_bulk_state(&record, &paths()), BulkChoice::No);
    }

    #[test]
    fn clicking_the_active_state_clears_it() {
        assert_eq!(BulkChoice::Yes.toggled(BulkChoice::Yes), BulkChoice::Cleared);
        assert_eq!(BulkChoice::Yes.toggled(BulkChoice::No), BulkChoice::No);
        assert_eq!(BulkChoice::Cleared.toggled(BulkChoice::Other), BulkChoice::Other);
    }

    #[test]
    fn parses_shell_values() {
        assert_eq!("yes".parse::<BulkChoice>().unwrap(), BulkChoice::Yes);
        assert_eq!("clear".parse::<BulkChoice>().unwrap(), BulkChoice::Cleared);
        assert!("maybe".parse::<BulkChoice>().is_err());
    }
}
