//! Composite controls and their lock/clear coupling.
//!
//! A coupled composite owns one primary choice and a few sibling members stored next
//! to it under a shared stem, e.g. `scopeInfo.thirdPartyPlatform_tws` and
//! `scopeInfo.thirdPartyPlatform_consent`. Moving the primary into certain values
//! clears members in the same write, and while a member is locked or hidden its
//! edits are dropped.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::catalog::CompositeKind;
use crate::errors::{FormError, Result};
use crate::record::rows::KeyedRow;
use crate::record::{ContactRow, ContractRecord, EmbargoRule, FieldPath};

pub const TWS_LISTED: &str = "上_TWS";
pub const TWS_NOT_LISTED: &str = "不上_TWS";
pub const TWS_OPTIONS: &[&str] = &[TWS_LISTED, TWS_NOT_LISTED];
pub const CONSENT_OPTIONS: &[&str] = &["書面通知", "書面同意"];

pub const DISCOVERY_ALL: &str = "全選";
pub const DISCOVERY_SINGLE: &str = "單選";
pub const DISCOVERY_NONE: &str = "各平台皆不上架";
pub const DISCOVERY_MODES: &[&str] = &[DISCOVERY_ALL, DISCOVERY_SINGLE, DISCOVERY_NONE];
pub const FUTURE_PLATFORM_OPTIONS: &[&str] = &["含將來合作平台", "僅包含現行合作平台"];
pub const REGION_OPTIONS: &[&str] = &["含CN", "不含CN"];
pub const DISCOVERY_PLATFORMS: &[&str] = &[
    "Google Scholar",
    "NAVER Academic",
    "Primo",
    "EBSCO EDS",
    "OCLC Discovery",
];

pub const NCL_DO_NOT_LIST: &str = "不上";
pub const NCL_EMBARGO: &str = "Embargo";
pub const NCL_MODES: &[&str] = &[NCL_DO_NOT_LIST, NCL_EMBARGO];
pub const EMBARGO_TARGETS: &[&str] = &["第三方平台", "國家圖書館", "TOAJ"];
pub const EMBARGO_PERIODS: &[&str] = &["一年", "半年", "一期"];

pub const DAMAGES_OPTIONS: &[&str] = &["是", "否"];
pub const DAMAGES_NONE: &str = "否";

/// Control shape of one composite member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberShape {
    Choice(&'static [&'static str]),
    Checkboxes(&'static [&'static str]),
    Rows,
    Text,
    Opaque,
}

/// Whether an edit reached the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Locked,
}

impl EditOutcome {
    pub fn applied(self) -> bool {
        self == EditOutcome::Applied
    }
}

/// A composite bound to its location in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    kind: CompositeKind,
    anchor: FieldPath,
    parent: Option<FieldPath>,
    stem: String,
}

impl Composite {
    /// Binds `kind` to the descriptor path it was declared at.
    pub fn at(kind: CompositeKind, anchor: &FieldPath) -> Result<Self> {
        let (stem, suffix) = match anchor.leaf().split_once('_') {
            Some((stem, suffix)) => (stem.to_string(), Some(suffix)),
            None => (anchor.leaf().to_string(), None),
        };
        if let Some(primary) = primary_suffix(kind) {
            if suffix != Some(primary) {
                return Err(FormError::malformed(
                    anchor.as_str(),
                    format!("{kind:?} must be declared at its `_{primary}` member"),
                ));
            }
        }
        Ok(Self {
            kind,
            anchor: anchor.clone(),
            parent: anchor.parent(),
            stem,
        })
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn anchor(&self) -> &FieldPath {
        &self.anchor
    }

    /// Path of the member stored as `{stem}_{suffix}` next to the anchor.
    pub fn member(&self, suffix: &str) -> Result<FieldPath> {
        let key = format!("{}_{}", self.stem, suffix);
        match &self.parent {
            Some(parent) => parent.child(&key),
            None => FieldPath::parse(&key),
        }
    }

    /// All member paths, the primary first.
    pub fn members(&self) -> Result<Vec<FieldPath>> {
        match member_suffixes(self.kind) {
            [] => Ok(vec![self.anchor.clone()]),
            suffixes => suffixes.iter().map(|suffix| self.member(suffix)).collect(),
        }
    }

    pub fn is_primary(&self, path: &FieldPath) -> bool {
        primary_suffix(self.kind).is_some() && path == &self.anchor
    }

    /// Suffix of the member `path` names or lies underneath.
    fn suffix_of<'p>(&self, path: &'p FieldPath) -> Option<&'p str> {
        let prefix = self.parent.as_ref().map_or(&[][..], |parent| parent.segments());
        let segments = path.segments();
        if segments.len() <= prefix.len() || !segments.starts_with(prefix) {
            return None;
        }
        segments[prefix.len()]
            .strip_prefix(self.stem.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
    }

    pub fn shape_of(&self, path: &FieldPath) -> MemberShape {
        let suffix = self.suffix_of(path).unwrap_or_default();
        match (self.kind, suffix) {
            (CompositeKind::ThirdPartyPlatform, "tws") => MemberShape::Choice(TWS_OPTIONS),
            (CompositeKind::ThirdPartyPlatform, "consent") => MemberShape::Checkboxes(CONSENT_OPTIONS),
            (CompositeKind::DiscoverySystem, "selectionType") => MemberShape::Choice(DISCOVERY_MODES),
            (CompositeKind::DiscoverySystem, "futurePlatforms") => {
                MemberShape::Choice(FUTURE_PLATFORM_OPTIONS)
            }
            (CompositeKind::DiscoverySystem, "includeCN") => MemberShape::Choice(REGION_OPTIONS),
            (CompositeKind::DiscoverySystem, "platforms") => {
                MemberShape::Checkboxes(DISCOVERY_PLATFORMS)
            }
            (CompositeKind::DiscoverySystem, "consent") => MemberShape::Checkboxes(CONSENT_OPTIONS),
            (CompositeKind::NclClause, "selectionType") => MemberShape::Choice(NCL_MODES),
            (CompositeKind::NclClause, "doNotList") => MemberShape::Checkboxes(EMBARGO_TARGETS),
            (CompositeKind::NclClause, "embargoRules") => MemberShape::Rows,
            (CompositeKind::Damages, "hasClause") => MemberShape::Choice(DAMAGES_OPTIONS),
            (CompositeKind::Damages, "description") => MemberShape::Text,
            (CompositeKind::Contacts, _) => MemberShape::Rows,
            _ => MemberShape::Opaque,
        }
    }

    fn primary_value<'r>(&self, record: &'r ContractRecord) -> &'r str {
        record.text(&self.anchor)
    }

    /// Members rendered for the current primary value. Hidden members are also locked.
    pub fn is_shown(&self, record: &ContractRecord, path: &FieldPath) -> bool {
        let primary = self.primary_value(record);
        match (self.kind, self.suffix_of(path)) {
            (CompositeKind::DiscoverySystem, Some("platforms")) => primary == DISCOVERY_SINGLE,
            (CompositeKind::DiscoverySystem, Some("futurePlatforms" | "includeCN" | "consent")) => {
                primary != DISCOVERY_NONE
            }
            (CompositeKind::NclClause, Some("doNotList")) => primary != NCL_EMBARGO,
            (CompositeKind::NclClause, Some("embargoRules")) => primary == NCL_EMBARGO,
            _ => true,
        }
    }

    /// True when edits to the member at `path` must be dropped.
    pub fn is_locked(&self, record: &ContractRecord, path: &FieldPath) -> bool {
        if self.is_primary(path) {
            return false;
        }
        if !self.is_shown(record, path) {
            return true;
        }
        let primary = self.primary_value(record);
        match (self.kind, self.suffix_of(path)) {
            (CompositeKind::ThirdPartyPlatform, Some("consent")) => primary == TWS_NOT_LISTED,
            (CompositeKind::Damages, Some("description")) => primary == DAMAGES_NONE,
            _ => false,
        }
    }

    pub fn has_primary(&self) -> bool {
        primary_suffix(self.kind).is_some()
    }

    /// Empty value for the member at `path`.
    pub fn blank_for(&self, path: &FieldPath) -> Value {
        match self.shape_of(path) {
            MemberShape::Text | MemberShape::Choice(_) => json!(""),
            _ => json!([]),
        }
    }

    /// Members cleared when the primary moves to `value`.
    pub fn clears_for(&self, value: &str) -> Result<Vec<(FieldPath, Value)>> {
        let cleared: &[&str] = match (self.kind, value) {
            (CompositeKind::ThirdPartyPlatform, TWS_NOT_LISTED) => &["consent"],
            (CompositeKind::DiscoverySystem, DISCOVERY_NONE) => &["platforms", "consent"],
            (CompositeKind::DiscoverySystem, DISCOVERY_ALL) => &["platforms"],
            (CompositeKind::NclClause, NCL_DO_NOT_LIST) => &["embargoRules"],
            (CompositeKind::NclClause, NCL_EMBARGO) => &["doNotList"],
            (CompositeKind::Damages, DAMAGES_NONE) => &["description"],
            _ => &[],
        };
        cleared
            .iter()
            .map(|suffix| {
                let path = self.member(suffix)?;
                let blank = self.blank_for(&path);
                Ok((path, blank))
            })
            .collect()
    }

    /// Writes the primary and clears the members it makes irrelevant.
    pub fn set_primary(&self, record: &mut ContractRecord, value: &str) -> Result<()> {
        if let MemberShape::Choice(options) = self.shape_of(&self.anchor) {
            if !options.contains(&value) {
                return Err(FormError::invalid_value(
                    self.anchor.as_str(),
                    format!("`{value}` is not one of {}", options.join(", ")),
                ));
            }
        }
        let clears = self.clears_for(value)?;
        record.set(&self.anchor, json!(value))?;
        for (path, blank) in clears {
            record.set(&path, blank)?;
        }
        Ok(())
    }
}

fn primary_suffix(kind: CompositeKind) -> Option<&'static str> {
    member_suffixes(kind).first().copied()
}

fn member_suffixes(kind: CompositeKind) -> &'static [&'static str] {
    match kind {
        CompositeKind::ThirdPartyPlatform => &["tws", "consent"],
        CompositeKind::DiscoverySystem => &[
            "selectionType",
            "futurePlatforms",
            "includeCN",
            "platforms",
            "consent",
        ],
        CompositeKind::NclClause => &["selectionType", "doNotList", "embargoRules"],
        CompositeKind::Damages => &["hasClause", "description"],
        CompositeKind::RoyaltySchedule
        | CompositeKind::Remittance
        | CompositeKind::Contacts
        | CompositeKind::ScanFile => &[],
    }
}

/// Record paths a composite declared at `anchor` reads and writes.
pub fn member_paths(kind: CompositeKind, anchor: &FieldPath) -> Result<Vec<FieldPath>> {
    Composite::at(kind, anchor)?.members()
}

/// Adds or removes `option` from a checkbox list.
pub fn toggle_option(current: Option<&Value>, option: &str, checked: bool) -> Value {
    let mut items: Vec<Value> = current
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let present = items.iter().any(|item| item.as_str() == Some(option));
    if checked && !present {
        items.push(json!(option));
    } else if !checked {
        items.retain(|item| item.as_str() != Some(option));
    }
    Value::Array(items)
}

/// Which part of a row an update replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct RowUpdate {
    pub field: String,
    pub value: Value,
}

impl RowUpdate {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

fn rows<T: DeserializeOwned>(record: &ContractRecord, path: &FieldPath) -> Result<Vec<T>> {
    match record.get(path) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(_) => record.typed(path),
    }
}

/// Appends `row` to the list at `path`.
pub fn add_row<T>(record: &mut ContractRecord, path: &FieldPath, row: T) -> Result<Uuid>
where
    T: KeyedRow + Serialize + DeserializeOwned,
{
    let mut list: Vec<T> = rows(record, path)?;
    let id = row.row_id();
    list.push(row);
    record.set_typed(path, &list)?;
    Ok(id)
}

/// Drops the row with `id`, keeping the survivors in insertion order.
pub fn remove_row<T>(record: &mut ContractRecord, path: &FieldPath, id: Uuid) -> Result<bool>
where
    T: KeyedRow + Serialize + DeserializeOwned,
{
    let mut list: Vec<T> = rows(record, path)?;
    let before = list.len();
    list.retain(|row| row.row_id() != id);
    if list.len() == before {
        return Ok(false);
    }
    record.set_typed(path, &list)?;
    Ok(true)
}

/// Replaces one named field of the row with `id`.
pub fn update_row<T>(
    record: &mut ContractRecord,
    path: &FieldPath,
    id: Uuid,
    update: RowUpdate,
) -> Result<bool>
where
    T: KeyedRow + Serialize + DeserializeOwned,
{
    let list: Vec<T> = rows(record, path)?;
    let Some(index) = list.iter().position(|row| row.row_id() == id) else {
        return Ok(false);
    };
    if update.field == "id" {
        return Err(FormError::invalid_value(path.as_str(), "row identifiers are fixed"));
    }
    let mut row = serde_json::to_value(&list[index])?;
    match row.as_object_mut() {
        Some(fields) if fields.contains_key(&update.field) => {
            fields.insert(update.field.clone(), update.value);
        }
        _ => {
            return Err(FormError::UnknownField(format!("{}.{}", path, update.field)));
        }
    }
    let row: T = serde_json::from_value(row)
        .map_err(|err| FormError::invalid_value(path.as_str(), err.to_string()))?;
    let mut list = list;
    list[index] = row;
    record.set_typed(path, &list)?;
    Ok(true)
}

/// A new embargo rule preset to the first target and period.
pub fn new_embargo_rule() -> EmbargoRule {
    EmbargoRule::new(EMBARGO_TARGETS[0], EMBARGO_PERIODS[0])
}

pub fn new_contact() -> ContactRow {
    ContactRow::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{literal_path, ContractLine};

    fn academic() -> ContractRecord {
        ContractRecord::blank(ContractLine::Academic)
    }

    fn platform() -> Composite {
        Composite::at(
            CompositeKind::ThirdPartyPlatform,
            &literal_path("scopeInfo.thirdPartyPlatform_tws"),
        )
        .unwrap()
    }

    fn ncl() -> Composite {
        Composite::at(
            CompositeKind::NclClause,
            &literal_path("scopeInfo.nclClause_selectionType"),
        )
        .unwrap()
    }

    #[test]
    fn members_are_siblings_of_the_anchor() {
        let paths: Vec<String> = platform()
            .members()
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["scopeInfo.thirdPartyPlatform_tws", "scopeInfo.thirdPartyPlatform_consent"]
        );
        let scan = member_paths(CompositeKind::ScanFile, &literal_path("scanFile")).unwrap();
        assert_eq!(scan, vec![literal_path("scanFile")]);
    }

    #[test]
    fn anchor_must_be_the_primary_member() {
        let err = Composite::at(
            CompositeKind::Damages,
            &literal_path("otherClauses.damages_description"),
        )
        .unwrap_err();
        assert!(matches!(err, FormError::MalformedPath { .. }));
    }

    #[test]
    fn not_listing_clears_and_locks_consent() {
        let mut record = academic();
        let consent = literal_path("scopeInfo.thirdPartyPlatform_consent");
        record.set(&consent, json!(["書面通知"])).unwrap();

        platform().set_primary(&mut record, TWS_NOT_LISTED).unwrap();
        assert_eq!(record.get(&consent), Some(&json!([])));
        assert!(platform().is_locked(&record, &consent));

        platform().set_primary(&mut record, TWS_LISTED).unwrap();
        assert!(!platform().is_locked(&record, &consent));
    }

    #[test]
    fn primary_rejects_unknown_options() {
        let mut record = academic();
        assert!(platform().set_primary(&mut record, "maybe").is_err());
        assert_eq!(
            record.text(&literal_path("scopeInfo.thirdPartyPlatform_tws")),
            TWS_LISTED
        );
    }

    #[test]
    fn discovery_mode_controls_which_groups_show() {
        let discovery = Composite::at(
            CompositeKind::DiscoverySystem,
            &literal_path("scopeInfo.discoverySystem_selectionType"),
        )
        .unwrap();
        let platforms = literal_path("scopeInfo.discoverySystem_platforms");
        let region = literal_path("scopeInfo.discoverySystem_includeCN");
        let mut record = academic();
        record.set(&platforms, json!(["Primo"])).unwrap();
        assert!(discovery.is_shown(&record, &platforms));

        discovery.set_primary(&mut record, DISCOVERY_NONE).unwrap();
        assert!(!discovery.is_shown(&record, &platforms));
        assert!(!discovery.is_shown(&record, &region));
        assert_eq!(record.get(&platforms), Some(&json!([])));

        discovery.set_primary(&mut record, DISCOVERY_ALL).unwrap();
        assert!(discovery.is_shown(&record, &region));
        assert!(discovery.is_locked(&record, &platforms));
    }

    #[test]
    fn ncl_mode_switches_between_lists() {
        let mut record = academic();
        let rules = literal_path("scopeInfo.nclClause_embargoRules");
        let do_not_list = literal_path("scopeInfo.nclClause_doNotList");
        record.set(&do_not_list, json!(["TOAJ"])).unwrap();

        ncl().set_primary(&mut record, NCL_EMBARGO).unwrap();
        assert_eq!(record.get(&do_not_list), Some(&json!([])));
        assert!(!ncl().is_locked(&record, &rules));

        add_row(&mut record, &rules, new_embargo_rule()).unwrap();
        ncl().set_primary(&mut record, NCL_DO_NOT_LIST).unwrap();
        assert_eq!(record.get(&rules), Some(&json!([])));
        assert!(ncl().is_locked(&record, &rules));
    }

    #[test]
    fn embargo_rows_add_update_and_remove_in_order() {
        let mut record = academic();
        let rules = literal_path("scopeInfo.nclClause_embargoRules");
        let first = add_row(&mut record, &rules, new_embargo_rule()).unwrap();
        let second = add_row(&mut record, &rules, new_embargo_rule()).unwrap();
        let third = add_row(&mut record, &rules, new_embargo_rule()).unwrap();

        let stored: Vec<EmbargoRule> = record.typed(&rules).unwrap();
        assert_eq!(stored[0].target, "第三方平台");
        assert_eq!(stored[0].period, "一年");

        assert!(update_row::<EmbargoRule>(&mut record, &rules, third, RowUpdate::new("period", "半年")).unwrap());
        assert!(remove_row::<EmbargoRule>(&mut record, &rules, second).unwrap());
        assert!(!remove_row::<EmbargoRule>(&mut record, &rules, second).unwrap());

        let stored: Vec<EmbargoRule> = record.typed(&rules).unwrap();
        let ids: Vec<Uuid> = stored.iter().map(|rule| rule.id).collect();
        assert_eq!(ids, vec![first, third]);
        assert_eq!(stored[1].period, "半年");
    }

    #[test]
    fn row_updates_reject_unknown_fields() {
        let mut record = ContractRecord::blank(ContractLine::LibraryServices);
        let contacts = literal_path("twBookContact.contacts");
        let id = add_row(&mut record, &contacts, new_contact()).unwrap();
        let err = update_row::<ContactRow>(&mut record, &contacts, id, RowUpdate::new("fax", "1"))
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownField(_)));
        assert!(update_row::<ContactRow>(&mut record, &contacts, id, RowUpdate::new("email", "a@b.tw")).unwrap());
    }

    #[test]
    fn toggling_keeps_set_semantics() {
        let once = toggle_option(None, "書面通知", true);
        let twice = toggle_option(Some(&once), "書面通知", true);
        assert_eq!(twice, json!(["書面通知"]));
        assert_eq!(toggle_option(Some(&twice), "書面通知", false), json!([]));
    }
}
