//! The form state store: single owner of the record being edited and of the
//! transient UI state around it.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::bulk::{self, BulkChoice};
use super::composite::{self, Composite, EditOutcome, RowUpdate};
use super::import::{self, HistoricalRecords};
use super::notification::{Clock, Notification, NotificationKind, NotificationSlot, SystemClock};
use super::renderer::{self, FieldEdit, PendingWrite, RenderedField};
use super::royalty_editor::RoyaltyEditor;
use super::validator::{self, MissingField};
use crate::catalog::{BulkGroup, Catalog, CompositeKind};
use crate::errors::{FormError, Result};
use crate::record::{
    literal_path, remittance, royalty, ContactRow, ContractLine, ContractRecord, DateScheme,
    EmbargoRule, FieldPath, RemittanceEntry,
};
use crate::utils::persistence::PersistenceSink;

pub const DEFAULT_NOTIFICATION_TTL_SECS: i64 = 5;

/// Contract-level dates mirrored into a lone royalty scheme, with the scheme key.
const INHERITED_DATES: [(&str, &str); 2] = [
    ("basicInfo.contractStartDate", "startDate"),
    ("basicInfo.contractEndDate", "endDate"),
];

/// Where a missing field lives, for jumping to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTarget {
    pub section_id: &'static str,
    pub path: FieldPath,
}

pub struct FormStore {
    catalog: Catalog,
    record: ContractRecord,
    notification: NotificationSlot,
    missing: Vec<MissingField>,
    panel_visible: bool,
    clock: Box<dyn Clock>,
}

impl FormStore {
    /// A store holding a blank record for `line`.
    pub fn new(line: ContractLine) -> Result<Self> {
        Self::with_record(ContractRecord::blank(line))
    }

    pub fn with_record(record: ContractRecord) -> Result<Self> {
        let catalog = Catalog::load(record.line)?;
        Ok(Self {
            catalog,
            record,
            notification: NotificationSlot::new(Duration::seconds(DEFAULT_NOTIFICATION_TTL_SECS)),
            missing: Vec::new(),
            panel_visible: false,
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification = NotificationSlot::new(ttl);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn record(&self) -> &ContractRecord {
        &self.record
    }

    pub fn line(&self) -> ContractLine {
        self.record.line
    }

    pub fn read(&self, path: &FieldPath) -> Option<&Value> {
        self.record.get(path)
    }

    /// Writes `value` at `path`.
    ///
    /// Writing a composite's primary also clears the members it makes irrelevant.
    /// Writes to locked or hidden composite members are dropped and reported as
    /// [`EditOutcome::Locked`]. Writing an ancestor of a composite runs the same
    /// coupling over the members it replaces.
    pub fn write(&mut self, path: &FieldPath, value: Value) -> Result<EditOutcome> {
        if let Some(owner) = self.catalog.composite_for(path) {
            if owner.is_primary(path) {
                let choice = value.as_str().ok_or_else(|| {
                    FormError::invalid_value(path.as_str(), "expected one of the listed options")
                })?;
                owner.set_primary(&mut self.record, choice)?;
                debug!(path = %path, "composite primary written");
                return Ok(EditOutcome::Applied);
            }
            if owner.is_locked(&self.record, path) {
                warn!(path = %path, "edit dropped: field is locked");
                return Ok(EditOutcome::Locked);
            }
        } else {
            let enclosed = self.catalog.composites_within(path);
            if !enclosed.is_empty() {
                return self.write_enclosing(path, value, &enclosed);
            }
            if let Some(descriptor) = self.catalog.descriptor_for(path) {
                renderer::check_value(descriptor, path, &value)?;
            }
        }

        self.record.set(path, value)?;
        self.inherit_contract_date(path)?;
        debug!(path = %path, "field written");
        Ok(EditOutcome::Applied)
    }

    /// Writes a subtree that holds whole composites. Each enclosed primary goes
    /// through [`Composite::set_primary`], and members that end up locked keep
    /// the value they had before the write. The rest of the subtree is applied.
    fn write_enclosing(
        &mut self,
        path: &FieldPath,
        value: Value,
        enclosed: &[Composite],
    ) -> Result<EditOutcome> {
        let mut next = self.record.clone();
        next.set(path, value)?;
        for owner in enclosed.iter().filter(|owner| owner.has_primary()) {
            let choice = match next.get(owner.anchor()) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(choice)) => choice.clone(),
                Some(_) => {
                    return Err(FormError::invalid_value(
                        owner.anchor().as_str(),
                        "expected one of the listed options",
                    ))
                }
            };
            if !choice.is_empty() {
                owner.set_primary(&mut next, &choice)?;
            }
            let cleared: Vec<FieldPath> = owner
                .clears_for(&choice)?
                .into_iter()
                .map(|(member, _)| member)
                .collect();
            for member in owner.members()? {
                if cleared.contains(&member) || !owner.is_locked(&next, &member) {
                    continue;
                }
                let kept = self
                    .record
                    .get(&member)
                    .cloned()
                    .unwrap_or_else(|| owner.blank_for(&member));
                if next.get(&member) != Some(&kept) {
                    warn!(path = %member, "edit dropped: field is locked");
                    next.set(&member, kept)?;
                }
            }
        }
        self.record = next;
        debug!(path = %path, composites = enclosed.len(), "subtree written");
        Ok(EditOutcome::Applied)
    }

    /// Copies a contract date into the royalty schedule while it still has a single
    /// scheme whose date is blank.
    fn inherit_contract_date(&mut self, path: &FieldPath) -> Result<()> {
        let Some((_, key)) = INHERITED_DATES.iter().find(|(raw, _)| *raw == path.as_str()) else {
            return Ok(());
        };
        let Some(Value::Array(schemes)) = self.record.get(&literal_path("royaltyInfo")) else {
            return Ok(());
        };
        if schemes.len() != 1 {
            return Ok(());
        }
        let scheme_date = schemes[0].get(*key).and_then(Value::as_str).unwrap_or("");
        if !scheme_date.is_empty() {
            return Ok(());
        }
        let value = self.record.get(path).cloned().unwrap_or(Value::Null);
        let target = literal_path(&format!("royaltyInfo.0.{key}"));
        self.record.set(&target, value)?;
        debug!(path = %target, "contract date inherited by royalty scheme");
        Ok(())
    }

    /// Applies a control gesture on the field or composite member at `path`.
    pub fn edit(&mut self, path: &FieldPath, edit: FieldEdit) -> Result<EditOutcome> {
        let pending = if let Some(owner) = self.catalog.composite_for(path) {
            if !owner.is_primary(path) && owner.is_locked(&self.record, path) {
                warn!(path = %path, "edit dropped: field is locked");
                return Ok(EditOutcome::Locked);
            }
            renderer::resolve_member_edit(&owner, path, &self.record, edit)?
        } else {
            let descriptor = self
                .catalog
                .descriptor_for(path)
                .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
            renderer::resolve_edit(descriptor, &self.record, edit)?
        };
        match pending {
            Some(PendingWrite { path, value }) => self.write(&path, value),
            None => Ok(EditOutcome::Applied),
        }
    }

    pub fn render_section(&self, section_id: &str) -> Result<Vec<RenderedField>> {
        renderer::render_section(&self.catalog, section_id, &self.record)
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: NotificationKind) {
        let now = self.clock.now();
        self.notification.post(text, kind, now);
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.current()
    }

    /// Clears the notification once it has expired.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        self.notification.tick(now)
    }

    pub fn tick_now(&mut self) -> bool {
        let now = self.clock.now();
        self.notification.tick(now)
    }

    pub fn dismiss_notification(&mut self) {
        self.notification.dismiss();
    }

    pub fn missing_fields(&self) -> &[MissingField] {
        &self.missing
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn dismiss_panel(&mut self) {
        self.panel_visible = false;
    }

    /// Re-runs validation from scratch. Shows the missing-fields panel and returns
    /// false when any required field is blank; hides it and returns true otherwise.
    pub fn validate_and_maybe_block(&mut self) -> bool {
        self.missing = validator::validate(&self.record, self.catalog.required_rules());
        self.panel_visible = !self.missing.is_empty();
        !self.panel_visible
    }

    /// Validates and, when nothing is missing, hands the record to `sink`.
    pub fn submit(&mut self, sink: &mut dyn PersistenceSink) -> Result<bool> {
        if !self.validate_and_maybe_block() {
            info!(
                line = self.line().slug(),
                missing = self.missing.len(),
                "submit rejected: required fields missing"
            );
            return Ok(false);
        }
        sink.persist(&self.record)?;
        info!(line = self.line().slug(), "submit accepted");
        self.notify("Contract saved", NotificationKind::Success);
        Ok(true)
    }

    /// Where the missing field labelled `label` lives.
    pub fn jump_target(&self, label: &str) -> Option<JumpTarget> {
        let path = self
            .missing
            .iter()
            .find(|field| field.label == label)
            .map(|field| &field.path)
            .or_else(|| self.catalog.path_for_label(label))?;
        let section = self.catalog.section_of(path)?;
        Some(JumpTarget {
            section_id: section.id,
            path: path.clone(),
        })
    }

    /// Replaces the active record with a copy of the prior contract stored under `key`.
    /// Failures become an error notification and leave the record untouched.
    pub fn import(&mut self, source: &dyn HistoricalRecords, key: &str) -> bool {
        match import::import_by_key(source, self.line(), key) {
            Ok(record) => {
                self.record = record;
                self.missing.clear();
                self.panel_visible = false;
                info!(line = self.line().slug(), key = key.trim(), "prior contract imported");
                self.notify("Prior contract imported, review before saving", NotificationKind::Success);
                true
            }
            Err(err) => {
                warn!(key = key.trim(), error = %err, "import failed");
                self.notify(err.to_string(), NotificationKind::Error);
                false
            }
        }
    }

    pub fn attach_scan_file(&mut self, file_name: &str) -> Result<()> {
        let name = file_name.trim();
        if name.is_empty() {
            return Err(FormError::invalid_value("scanFile", "file name is blank"));
        }
        self.write(&literal_path("scanFile"), json!(name))?;
        Ok(())
    }

    pub fn scan_file_label(&self) -> String {
        renderer::scan_file_label(&self.record)
    }

    fn composite_path(&self, kind: CompositeKind, suffix: Option<&str>) -> Result<FieldPath> {
        let owner = self
            .catalog
            .composite(kind)
            .ok_or_else(|| FormError::UnknownField(format!("{kind:?} on {}", self.line())))?;
        match suffix {
            Some(suffix) => owner.member(suffix),
            None => Ok(owner.anchor().clone()),
        }
    }

    pub fn royalty_schedule(&self) -> Result<Vec<DateScheme>> {
        let path = self.composite_path(CompositeKind::RoyaltySchedule, None)?;
        self.record.typed(&path)
    }

    /// Opens a detached draft of the royalty schedule.
    pub fn open_royalty_editor(&self) -> Result<RoyaltyEditor> {
        Ok(RoyaltyEditor::open(&self.royalty_schedule()?))
    }

    /// Writes the draft back in one write.
    pub fn commit_royalty(&mut self, editor: RoyaltyEditor) -> Result<()> {
        let path = self.composite_path(CompositeKind::RoyaltySchedule, None)?;
        let value = serde_json::to_value(editor.into_schedule())?;
        self.write(&path, value)?;
        Ok(())
    }

    pub fn remittance_entries(&self) -> Result<Vec<RemittanceEntry>> {
        let path = self.composite_path(CompositeKind::Remittance, None)?;
        match self.record.get(&path) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(_) => self.record.typed(&path),
        }
    }

    /// Makes the remittance list match the beneficiaries named in the royalty
    /// schedule. Returns the number of distinct beneficiaries.
    pub fn sync_remittance(&mut self) -> Result<usize> {
        let names = royalty::beneficiaries(&self.royalty_schedule()?);
        let sync = remittance::reconcile(self.remittance_entries()?, &names);
        if !sync.dropped.is_empty() {
            warn!(
                dropped = sync.dropped.len(),
                "remittance entries removed for beneficiaries no longer in the royalty schedule"
            );
        }
        if sync.changed() {
            let path = self.composite_path(CompositeKind::Remittance, None)?;
            self.write(&path, serde_json::to_value(&sync.entries)?)?;
        }
        info!(
            beneficiaries = names.len(),
            added = sync.added.len(),
            dropped = sync.dropped.len(),
            "remittance synced"
        );
        self.notify(
            format!("Synced {} beneficiaries", names.len()),
            NotificationKind::Success,
        );
        Ok(names.len())
    }

    fn group(&self, group_id: &str) -> Result<&BulkGroup> {
        self.catalog
            .bulk_group(group_id)
            .ok_or_else(|| FormError::UnknownField(format!("bulk group `{group_id}`")))
    }

    pub fn apply_bulk(&mut self, group_id: &str, choice: BulkChoice) -> Result<()> {
        let paths = self.group(group_id)?.paths.clone();
        bulk::apply_bulk(&mut self.record, &paths, choice)?;
        debug!(group = group_id, choice = choice.as_str(), fields = paths.len(), "bulk applied");
        Ok(())
    }

    /// Derived from the current field values, so individual edits are reflected too.
    pub fn bulk_state(&self, group_id: &str) -> Result<BulkChoice> {
        Ok(bulk::current_bulk_state(&self.record, &self.group(group_id)?.paths))
    }

    /// Clicking the active state clears the group; any other state is applied.
    pub fn click_bulk(&mut self, group_id: &str, clicked: BulkChoice) -> Result<BulkChoice> {
        let next = self.bulk_state(group_id)?.toggled(clicked);
        self.apply_bulk(group_id, next)?;
        Ok(next)
    }

    fn embargo_path(&self) -> Result<FieldPath> {
        self.composite_path(CompositeKind::NclClause, Some("embargoRules"))
    }

    fn locked(&self, path: &FieldPath) -> bool {
        let locked = self
            .catalog
            .composite_for(path)
            .map_or(false, |owner| owner.is_locked(&self.record, path));
        if locked {
            warn!(path = %path, "edit dropped: field is locked");
        }
        locked
    }

    /// Appends an embargo rule. Returns `None` while the embargo list is not active.
    pub fn add_embargo_rule(&mut self) -> Result<Option<Uuid>> {
        let path = self.embargo_path()?;
        if self.locked(&path) {
            return Ok(None);
        }
        let id = composite::add_row(&mut self.record, &path, composite::new_embargo_rule())?;
        debug!(path = %path, "embargo rule added");
        Ok(Some(id))
    }

    pub fn remove_embargo_rule(&mut self, id: Uuid) -> Result<EditOutcome> {
        let path = self.embargo_path()?;
        if self.locked(&path) {
            return Ok(EditOutcome::Locked);
        }
        composite::remove_row::<EmbargoRule>(&mut self.record, &path, id)?;
        Ok(EditOutcome::Applied)
    }

    pub fn update_embargo_rule(&mut self, id: Uuid, update: RowUpdate) -> Result<EditOutcome> {
        let path = self.embargo_path()?;
        if self.locked(&path) {
            return Ok(EditOutcome::Locked);
        }
        composite::update_row::<EmbargoRule>(&mut self.record, &path, id, update)?;
        Ok(EditOutcome::Applied)
    }

    fn contacts_path(&self) -> Result<FieldPath> {
        self.composite_path(CompositeKind::Contacts, None)
    }

    pub fn add_contact(&mut self) -> Result<Uuid> {
        let path = self.contacts_path()?;
        let id = composite::add_row(&mut self.record, &path, composite::new_contact())?;
        debug!(path = %path, "contact added");
        Ok(id)
    }

    pub fn remove_contact(&mut self, id: Uuid) -> Result<bool> {
        let path = self.contacts_path()?;
        composite::remove_row::<ContactRow>(&mut self.record, &path, id)
    }

    pub fn update_contact(&mut self, id: Uuid, update: RowUpdate) -> Result<bool> {
        let path = self.contacts_path()?;
        composite::update_row::<ContactRow>(&mut self.record, &path, id, update)
    }
}
