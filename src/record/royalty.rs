use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a volume boundary is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VolumeFormat {
    #[default]
    VolumeIssue,
    YearMonth,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolumeIdentifier {
    #[serde(default)]
    pub format: VolumeFormat,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub description: String,
}

/// One beneficiary's share under a volume rule. Percentages are free text and are
/// not required to add up to 100 across a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltySplit {
    pub id: Uuid,
    #[serde(default)]
    pub beneficiary: String,
    #[serde(default)]
    pub percentage: String,
}

impl RoyaltySplit {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            beneficiary: String::new(),
            percentage: String::new(),
        }
    }

    pub fn with_beneficiary(beneficiary: impl Into<String>, percentage: impl Into<String>) -> Self {
        Self {
            beneficiary: beneficiary.into(),
            percentage: percentage.into(),
            ..Self::new()
        }
    }
}

impl Default for RoyaltySplit {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRule {
    pub id: Uuid,
    #[serde(default)]
    pub start_volume_info: VolumeIdentifier,
    #[serde(default)]
    pub end_volume_info: VolumeIdentifier,
    #[serde(default)]
    pub royalty_splits: Vec<RoyaltySplit>,
}

impl VolumeRule {
    /// A rule with blank volume bounds and a single blank split.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            start_volume_info: VolumeIdentifier::default(),
            end_volume_info: VolumeIdentifier::default(),
            royalty_splits: vec![RoyaltySplit::new()],
        }
    }
}

impl Default for VolumeRule {
    fn default() -> Self {
        Self::new()
    }
}

/// A contract date range holding the volume rules that apply within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateScheme {
    pub id: Uuid,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub volume_rules: Vec<VolumeRule>,
}

impl DateScheme {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            volume_rules: vec![VolumeRule::new()],
        }
    }

    pub fn blank() -> Self {
        Self::new("", "")
    }

    pub fn rule_mut(&mut self, id: Uuid) -> Option<&mut VolumeRule> {
        self.volume_rules.iter_mut().find(|rule| rule.id == id)
    }
}

/// Distinct, trimmed, non-blank beneficiary names in first-seen order.
pub fn beneficiaries(schedule: &[DateScheme]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let splits = schedule
        .iter()
        .flat_map(|scheme| scheme.volume_rules.iter())
        .flat_map(|rule| rule.royalty_splits.iter());
    for split in splits {
        let name = split.beneficiary.trim();
        if !name.is_empty() && !names.iter().any(|known| known == name) {
            names.push(name.to_string());
        }
    }
    names
}
