//! Maps descriptors and record values to controls, and control gestures to writes.
//!
//! Rendering is pure. Edits are resolved against the current record into a single
//! [`PendingWrite`] which the store applies, so every change goes through
//! [`FormStore::write`](crate::form::FormStore::write).

use serde_json::{json, Value};

use super::composite::{self, Composite, MemberShape};
use crate::catalog::{Catalog, CompositeKind, FieldDescriptor, FieldKind, LayoutHint};
use crate::errors::{FormError, Result};
use crate::record::{
    literal_path, royalty, ContractRecord, DateScheme, FieldPath, RemittanceEntry,
};

pub const OTHER: &str = "other";
pub const NO_SCAN_FILE: &str = "No file uploaded";

/// A descriptor resolved against the current record.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    pub id: &'static str,
    pub label: &'static str,
    pub path: FieldPath,
    pub required: bool,
    pub layout: LayoutHint,
    pub control: Control,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Text(String),
    TextArea(String),
    Date(String),
    SingleChoice {
        options: &'static [&'static str],
        selected: String,
    },
    Checkboxes {
        options: &'static [&'static str],
        checked: Vec<String>,
        locked: bool,
    },
    Tags(Vec<String>),
    Cascading {
        main: String,
        sub: String,
        main_options: Vec<&'static str>,
        sub_options: &'static [&'static str],
    },
    PercentageNote {
        percentage: String,
        details: String,
    },
    ChoiceWithOther {
        selected: String,
        details: String,
    },
    Group(Vec<RenderedField>),
    Composite(CompositeView),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompositeView {
    /// Lock/clear composites: the visible members with their lock state.
    Coupled(Vec<MemberView>),
    RoyaltySchedule {
        schemes: usize,
        beneficiaries: Vec<String>,
    },
    Remittance(Vec<String>),
    Contacts(usize),
    ScanFile(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberView {
    pub path: FieldPath,
    pub shape: MemberShape,
    pub value: Value,
    pub locked: bool,
}

/// Keys that act on a tag input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey {
    Enter,
    Comma,
    Backspace,
}

/// A user gesture on one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Replace(String),
    TagKey { pending: String, key: TagKey },
    RemoveTag(String),
    Toggle { option: String, checked: bool },
    CascadeMain(String),
    CascadeSub(String),
    Percentage(String),
    Note(String),
    Choose(String),
    Details(String),
    FocusDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub path: FieldPath,
    pub value: Value,
}

impl PendingWrite {
    fn new(path: &FieldPath, value: Value) -> Option<Self> {
        Some(Self {
            path: path.clone(),
            value,
        })
    }
}

fn text_at(record: &ContractRecord, path: &FieldPath, key: &str) -> String {
    record
        .get(path)
        .and_then(|value| value.get(key))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Renders one descriptor, or `None` when its visibility predicate hides it.
pub fn render_field(descriptor: &FieldDescriptor, record: &ContractRecord) -> Result<Option<RenderedField>> {
    if !descriptor.is_visible(record) {
        return Ok(None);
    }
    let path = &descriptor.path;
    let control = match &descriptor.kind {
        FieldKind::Text => Control::Text(record.text(path).to_string()),
        FieldKind::TextArea => Control::TextArea(record.text(path).to_string()),
        FieldKind::Date => Control::Date(record.text(path).to_string()),
        FieldKind::SingleChoice(options) => Control::SingleChoice {
            options: *options,
            selected: record.text(path).to_string(),
        },
        FieldKind::Checkboxes(options) => Control::Checkboxes {
            options: *options,
            checked: strings(record.get(path)),
            locked: false,
        },
        FieldKind::Tags => Control::Tags(strings(record.get(path))),
        FieldKind::Cascading(tree) => {
            let main = text_at(record, path, "main");
            let sub_options = tree
                .iter()
                .find(|(category, _)| *category == main)
                .map(|(_, subs)| *subs)
                .unwrap_or(&[]);
            Control::Cascading {
                sub: text_at(record, path, "sub"),
                main,
                main_options: descriptor.options(),
                sub_options,
            }
        }
        FieldKind::PercentageNote => Control::PercentageNote {
            percentage: text_at(record, path, "percentage"),
            details: text_at(record, path, "details"),
        },
        FieldKind::ChoiceWithOther => Control::ChoiceWithOther {
            selected: text_at(record, path, "selected"),
            details: text_at(record, path, "details"),
        },
        FieldKind::Group(members) => {
            let mut rendered = Vec::with_capacity(members.len());
            for member in members {
                if let Some(field) = render_field(member, record)? {
                    rendered.push(field);
                }
            }
            Control::Group(rendered)
        }
        FieldKind::Composite(kind) => Control::Composite(render_composite(*kind, path, record)?),
    };
    Ok(Some(RenderedField {
        id: descriptor.id,
        label: descriptor.label,
        path: path.clone(),
        required: descriptor.required,
        layout: descriptor.layout,
        control,
    }))
}

fn render_composite(kind: CompositeKind, anchor: &FieldPath, record: &ContractRecord) -> Result<CompositeView> {
    let view = match kind {
        CompositeKind::RoyaltySchedule => {
            let schedule: Vec<DateScheme> = record.typed(anchor)?;
            CompositeView::RoyaltySchedule {
                schemes: schedule.len(),
                beneficiaries: royalty::beneficiaries(&schedule),
            }
        }
        CompositeKind::Remittance => {
            let entries: Vec<RemittanceEntry> = record.typed(anchor)?;
            CompositeView::Remittance(entries.into_iter().map(|entry| entry.beneficiary).collect())
        }
        CompositeKind::Contacts => CompositeView::Contacts(
            record.get(anchor).and_then(Value::as_array).map_or(0, Vec::len),
        ),
        CompositeKind::ScanFile => CompositeView::ScanFile(scan_file_label(record)),
        coupled => {
            let composite = Composite::at(coupled, anchor)?;
            let members = composite
                .members()?
                .into_iter()
                .filter(|member| composite.is_shown(record, member))
                .map(|member| MemberView {
                    shape: composite.shape_of(&member),
                    value: record.get(&member).cloned().unwrap_or(Value::Null),
                    locked: composite.is_locked(record, &member),
                    path: member,
                })
                .collect();
            CompositeView::Coupled(members)
        }
    };
    Ok(view)
}

/// Renders every visible field of a section in declaration order.
pub fn render_section(catalog: &Catalog, section_id: &str, record: &ContractRecord) -> Result<Vec<RenderedField>> {
    let mut rendered = Vec::new();
    for descriptor in catalog.fields_for(section_id)? {
        if let Some(field) = render_field(descriptor, record)? {
            rendered.push(field);
        }
    }
    Ok(rendered)
}

/// The stored attachment name, or a placeholder when none is attached.
pub fn scan_file_label(record: &ContractRecord) -> String {
    match record.text(&literal_path("scanFile")).trim() {
        "" => NO_SCAN_FILE.to_string(),
        name => name.to_string(),
    }
}

fn unsupported(descriptor: &FieldDescriptor, edit: &FieldEdit) -> FormError {
    FormError::invalid_value(
        descriptor.path.as_str(),
        format!("{edit:?} does not apply to a {} control", descriptor.kind.name()),
    )
}

fn ensure_option(path: &FieldPath, options: &[&str], value: &str) -> Result<()> {
    if value.is_empty() || options.contains(&value) {
        Ok(())
    } else {
        Err(FormError::invalid_value(
            path.as_str(),
            format!("`{value}` is not one of {}", options.join(", ")),
        ))
    }
}

/// Resolves a gesture on `descriptor` into the write it implies, if any.
pub fn resolve_edit(
    descriptor: &FieldDescriptor,
    record: &ContractRecord,
    edit: FieldEdit,
) -> Result<Option<PendingWrite>> {
    let path = &descriptor.path;
    match (&descriptor.kind, edit) {
        (FieldKind::Text | FieldKind::TextArea | FieldKind::Date, FieldEdit::Replace(value)) => {
            Ok(PendingWrite::new(path, json!(value)))
        }
        (FieldKind::SingleChoice(options), FieldEdit::Replace(value) | FieldEdit::Choose(value)) => {
            ensure_option(path, options, &value)?;
            Ok(PendingWrite::new(path, json!(value)))
        }
        (FieldKind::Checkboxes(options), FieldEdit::Toggle { option, checked }) => {
            ensure_option(path, options, &option)?;
            Ok(PendingWrite::new(
                path,
                composite::toggle_option(record.get(path), &option, checked),
            ))
        }
        (FieldKind::Tags, edit @ (FieldEdit::TagKey { .. } | FieldEdit::RemoveTag(_))) => {
            let tags = strings(record.get(path));
            Ok(edit_tags(tags, edit).and_then(|tags| PendingWrite::new(path, json!(tags))))
        }
        (FieldKind::Cascading(_), FieldEdit::CascadeMain(main)) => {
            ensure_option(path, &descriptor.options(), &main)?;
            Ok(PendingWrite::new(path, json!({ "main": main, "sub": "" })))
        }
        (FieldKind::Cascading(tree), FieldEdit::CascadeSub(sub)) => {
            let main = text_at(record, path, "main");
            let subs = tree
                .iter()
                .find(|(category, _)| *category == main)
                .map(|(_, subs)| *subs)
                .unwrap_or(&[]);
            ensure_option(path, subs, &sub)?;
            Ok(PendingWrite::new(path, json!({ "main": main, "sub": sub })))
        }
        (FieldKind::PercentageNote, FieldEdit::Percentage(percentage)) => {
            let details = text_at(record, path, "details");
            Ok(PendingWrite::new(path, json!({ "percentage": percentage, "details": details })))
        }
        (FieldKind::PercentageNote, FieldEdit::Note(details)) => {
            let percentage = text_at(record, path, "percentage");
            Ok(PendingWrite::new(path, json!({ "percentage": percentage, "details": details })))
        }
        (FieldKind::ChoiceWithOther, FieldEdit::Choose(selected)) => {
            ensure_option(path, &["yes", "no", OTHER], &selected)?;
            let details = if selected == OTHER {
                text_at(record, path, "details")
            } else {
                String::new()
            };
            Ok(PendingWrite::new(path, json!({ "selected": selected, "details": details })))
        }
        (FieldKind::ChoiceWithOther, FieldEdit::Details(details)) => {
            Ok(PendingWrite::new(path, json!({ "selected": OTHER, "details": details })))
        }
        (FieldKind::ChoiceWithOther, FieldEdit::FocusDetails) => {
            if text_at(record, path, "selected") == OTHER {
                return Ok(None);
            }
            let details = text_at(record, path, "details");
            Ok(PendingWrite::new(path, json!({ "selected": OTHER, "details": details })))
        }
        (_, edit) => Err(unsupported(descriptor, &edit)),
    }
}

/// Resolves a gesture on one member of a coupled composite.
pub fn resolve_member_edit(
    composite: &Composite,
    path: &FieldPath,
    record: &ContractRecord,
    edit: FieldEdit,
) -> Result<Option<PendingWrite>> {
    match (composite.shape_of(path), edit) {
        (MemberShape::Choice(options), FieldEdit::Replace(value) | FieldEdit::Choose(value)) => {
            ensure_option(path, options, &value)?;
            Ok(PendingWrite::new(path, json!(value)))
        }
        (MemberShape::Checkboxes(options), FieldEdit::Toggle { option, checked }) => {
            ensure_option(path, options, &option)?;
            Ok(PendingWrite::new(
                path,
                composite::toggle_option(record.get(path), &option, checked),
            ))
        }
        (MemberShape::Text, FieldEdit::Replace(value)) => Ok(PendingWrite::new(path, json!(value))),
        (shape, edit) => Err(FormError::invalid_value(
            path.as_str(),
            format!("{edit:?} does not apply to a {shape:?} member"),
        )),
    }
}

/// Applies a tag gesture. Returns `None` when the gesture leaves the tags unchanged.
fn edit_tags(mut tags: Vec<String>, edit: FieldEdit) -> Option<Vec<String>> {
    match edit {
        FieldEdit::TagKey {
            pending,
            key: TagKey::Enter | TagKey::Comma,
        } => {
            let tag = pending.trim().trim_end_matches(',').trim();
            if tag.is_empty() || tags.iter().any(|known| known == tag) {
                return None;
            }
            tags.push(tag.to_string());
            Some(tags)
        }
        FieldEdit::TagKey {
            pending,
            key: TagKey::Backspace,
        } => {
            if !pending.is_empty() {
                return None;
            }
            tags.pop().map(|_| tags)
        }
        FieldEdit::RemoveTag(value) => {
            let before = tags.len();
            tags.retain(|tag| tag != &value);
            (tags.len() != before).then_some(tags)
        }
        _ => None,
    }
}

/// Rejects direct writes whose value shape does not match the descriptor's control.
pub fn check_value(descriptor: &FieldDescriptor, path: &FieldPath, value: &Value) -> Result<()> {
    if path != &descriptor.path {
        return Ok(());
    }
    let matches = match &descriptor.kind {
        FieldKind::Text | FieldKind::TextArea | FieldKind::Date => value.is_string(),
        FieldKind::SingleChoice(options) => value
            .as_str()
            .map_or(false, |choice| choice.is_empty() || options.contains(&choice)),
        FieldKind::Checkboxes(_) | FieldKind::Tags => value
            .as_array()
            .map_or(false, |items| items.iter().all(Value::is_string)),
        FieldKind::Cascading(_)
        | FieldKind::PercentageNote
        | FieldKind::ChoiceWithOther
        | FieldKind::Group(_) => value.is_object(),
        FieldKind::Composite(_) => true,
    };
    if matches {
        Ok(())
    } else {
        Err(FormError::invalid_value(
            path.as_str(),
            format!("value does not fit a {} control", descriptor.kind.name()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionFields;
    use crate::record::ContractLine;

    fn academic() -> ContractRecord {
        ContractRecord::blank(ContractLine::Academic)
    }

    fn apply(record: &mut ContractRecord, write: Option<PendingWrite>) {
        if let Some(write) = write {
            record.set(&write.path, write.value).unwrap();
        }
    }

    #[test]
    fn tags_commit_on_enter_or_comma_without_duplicates() {
        let field = SectionFields::under("basicInfo").tags("contractParty", "Parties");
        let mut record = academic();
        for (pending, key) in [("  A ", TagKey::Enter), ("B,", TagKey::Comma), ("A", TagKey::Enter), ("  ", TagKey::Enter)] {
            let write = resolve_edit(
                &field,
                &record,
                FieldEdit::TagKey {
                    pending: pending.into(),
                    key,
                },
            )
            .unwrap();
            apply(&mut record, write);
        }
        assert_eq!(record.get(&field.path), Some(&json!(["A", "B"])));
    }

    #[test]
    fn backspace_only_removes_when_input_is_empty() {
        let field = SectionFields::under("basicInfo").tags("contractParty", "Parties");
        let mut record = academic();
        record.set(&field.path, json!(["A", "B"])).unwrap();
        let typing = FieldEdit::TagKey {
            pending: "x".into(),
            key: TagKey::Backspace,
        };
        assert_eq!(resolve_edit(&field, &record, typing).unwrap(), None);

        let empty = FieldEdit::TagKey {
            pending: String::new(),
            key: TagKey::Backspace,
        };
        let write = resolve_edit(&field, &record, empty).unwrap();
        apply(&mut record, write);
        assert_eq!(record.get(&field.path), Some(&json!(["A"])));

        let write = resolve_edit(&field, &record, FieldEdit::RemoveTag("A".into())).unwrap();
        apply(&mut record, write);
        assert_eq!(record.get(&field.path), Some(&json!([])));
    }

    #[test]
    fn changing_main_category_clears_sub() {
        let catalog = Catalog::load(ContractLine::Academic).unwrap();
        let field = catalog
            .descriptor_for(&literal_path("rightsInfo.authorization"))
            .unwrap();
        let mut record = academic();
        let write = resolve_edit(field, &record, FieldEdit::CascadeMain("專屬".into())).unwrap();
        apply(&mut record, write);
        let write = resolve_edit(field, &record, FieldEdit::CascadeSub("L3".into())).unwrap();
        apply(&mut record, write);
        assert_eq!(record.get(&field.path), Some(&json!({ "main": "專屬", "sub": "L3" })));

        let write = resolve_edit(field, &record, FieldEdit::CascadeMain("獨家".into())).unwrap();
        apply(&mut record, write);
        assert_eq!(record.get(&field.path), Some(&json!({ "main": "獨家", "sub": "" })));

        assert!(resolve_edit(field, &record, FieldEdit::CascadeSub("L3".into())).is_err());
    }

    #[test]
    fn choice_with_other_clears_details_and_focus_forces_other() {
        let field = SectionFields::under("rightsInfo").with_other("tts", "TTS");
        let mut record = ContractRecord::blank(ContractLine::LibraryServices);

        let write = resolve_edit(&field, &record, FieldEdit::FocusDetails).unwrap();
        apply(&mut record, write);
        assert_eq!(record.text(&literal_path("rightsInfo.tts.selected")), OTHER);
        assert_eq!(resolve_edit(&field, &record, FieldEdit::FocusDetails).unwrap(), None);

        let write = resolve_edit(&field, &record, FieldEdit::Details("per title".into())).unwrap();
        apply(&mut record, write);
        let write = resolve_edit(&field, &record, FieldEdit::Choose("yes".into())).unwrap();
        apply(&mut record, write);
        assert_eq!(record.get(&field.path), Some(&json!({ "selected": "yes", "details": "" })));
    }

    #[test]
    fn percentage_parts_edit_independently() {
        let field = SectionFields::under("rightsInfo").percentage("trialPercentage", "Trial");
        let mut record = ContractRecord::blank(ContractLine::LibraryServices);
        let write = resolve_edit(&field, &record, FieldEdit::Note("first chapter".into())).unwrap();
        apply(&mut record, write);
        let write = resolve_edit(&field, &record, FieldEdit::Percentage("10".into())).unwrap();
        apply(&mut record, write);
        assert_eq!(
            record.get(&field.path),
            Some(&json!({ "percentage": "10", "details": "first chapter" }))
        );
    }

    #[test]
    fn hidden_fields_do_not_render() {
        let catalog = Catalog::load(ContractLine::Academic).unwrap();
        let mut record = academic();
        let visible = render_section(&catalog, "termination-info", &record).unwrap();
        assert_eq!(visible.len(), 1);

        record
            .set(&literal_path("terminationInfo.isTerminated"), json!("是"))
            .unwrap();
        let visible = render_section(&catalog, "termination-info", &record).unwrap();
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn locked_members_render_as_locked() {
        let catalog = Catalog::load(ContractLine::Academic).unwrap();
        let mut record = academic();
        record
            .set(&literal_path("scopeInfo.thirdPartyPlatform_tws"), json!("不上_TWS"))
            .unwrap();
        let scope = render_section(&catalog, "scope-info", &record).unwrap();
        let Control::Composite(CompositeView::Coupled(members)) = &scope[0].control else {
            panic!("expected a coupled composite, got {:?}", scope[0].control);
        };
        assert!(!members[0].locked);
        assert!(members[1].locked);
    }

    #[test]
    fn mismatched_value_shapes_are_rejected() {
        let field = SectionFields::under("basicInfo").tags("contractParty", "Parties");
        assert!(check_value(&field, &field.path, &json!("A")).is_err());
        assert!(check_value(&field, &field.path, &json!(["A"])).is_ok());
    }

    #[test]
    fn scan_file_placeholder() {
        let mut record = academic();
        assert_eq!(scan_file_label(&record), NO_SCAN_FILE);
        record.set(&literal_path("scanFile"), json!("contract.pdf")).unwrap();
        assert_eq!(scan_file_label(&record), "contract.pdf");
    }
}
