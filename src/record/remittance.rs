use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountType {
    #[default]
    #[serde(rename = "國內")]
    Domestic,
    #[serde(rename = "海外")]
    Overseas,
}

/// Banking details for one beneficiary of the royalty schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemittanceEntry {
    pub id: Uuid,
    pub beneficiary: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub check_title: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub branch_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_notes: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub royalty_settlement_month: String,
    #[serde(default)]
    pub payment_receipt_flow: String,
}

impl RemittanceEntry {
    pub fn new(beneficiary: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            beneficiary: beneficiary.into(),
            account_type: AccountType::Domestic,
            account_name: String::new(),
            check_title: String::new(),
            currency: String::new(),
            bank_name: String::new(),
            branch_name: String::new(),
            account_number: String::new(),
            account_notes: String::new(),
            tax_id: String::new(),
            id_number: String::new(),
            royalty_settlement_month: String::new(),
            payment_receipt_flow: String::new(),
        }
    }
}

/// Result of reconciling remittance entries against the current beneficiary set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemittanceSync {
    pub entries: Vec<RemittanceEntry>,
    pub added: Vec<String>,
    pub dropped: Vec<RemittanceEntry>,
}

impl RemittanceSync {
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.dropped.is_empty()
    }
}

/// Keeps surviving entries in place, appends a blank entry per new beneficiary, and
/// drops entries whose beneficiary no longer appears. Running it twice is a no-op.
pub fn reconcile(existing: Vec<RemittanceEntry>, beneficiaries: &[String]) -> RemittanceSync {
    let (mut entries, dropped): (Vec<_>, Vec<_>) = existing
        .into_iter()
        .partition(|entry| beneficiaries.iter().any(|name| *name == entry.beneficiary));

    let mut added = Vec::new();
    for name in beneficiaries {
        if !entries.iter().any(|entry| entry.beneficiary == *name) {
            entries.push(RemittanceEntry::new(name.clone()));
            added.push(name.clone());
        }
    }

    RemittanceSync {
        entries,
        added,
        dropped,
    }
}
