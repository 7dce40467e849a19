mod common;

use chrono::Duration;
use common::{fixed_clock, path, store, store_with_clock};
use contract_forms::{
    form::{EditOutcome, FieldEdit, InMemoryHistory, NotificationKind},
    utils::persistence::MemorySink,
    ContractLine,
};
use serde_json::json;

#[test]
fn contract_dates_flow_into_the_blank_royalty_scheme() {
    let mut store = store(ContractLine::Academic);

    store
        .write(&path("basicInfo.contractStartDate"), json!("2024-01-01"))
        .unwrap();
    store
        .write(&path("basicInfo.contractEndDate"), json!("2025-12-31"))
        .unwrap();

    let schedule = store.royalty_schedule().unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].start_date, "2024-01-01");
    assert_eq!(schedule[0].end_date, "2025-12-31");
}

#[test]
fn contract_dates_do_not_overwrite_a_hand_edited_scheme() {
    let mut store = store(ContractLine::Academic);
    let mut editor = store.open_royalty_editor().unwrap();
    let scheme = editor.schemes()[0].id;
    editor.set_dates(scheme, "2023-07-01", "").unwrap();
    store.commit_royalty(editor).unwrap();

    store
        .write(&path("basicInfo.contractStartDate"), json!("2024-01-01"))
        .unwrap();

    let schedule = store.royalty_schedule().unwrap();
    assert_eq!(schedule[0].start_date, "2023-07-01");
}

#[test]
fn unlisting_from_tws_clears_and_locks_consent() {
    let mut store = store(ContractLine::Academic);
    let consent = path("scopeInfo.thirdPartyPlatform_consent");
    store
        .edit(
            &consent,
            FieldEdit::Toggle {
                option: "書面同意".into(),
                checked: true,
            },
        )
        .unwrap();
    assert_eq!(store.read(&consent), Some(&json!(["書面同意"])));

    store
        .write(&path("scopeInfo.thirdPartyPlatform_tws"), json!("不上_TWS"))
        .unwrap();
    assert_eq!(store.read(&consent), Some(&json!([])));

    let outcome = store
        .edit(
            &consent,
            FieldEdit::Toggle {
                option: "書面通知".into(),
                checked: true,
            },
        )
        .unwrap();
    assert_eq!(outcome, EditOutcome::Locked);
    assert_eq!(store.read(&consent), Some(&json!([])));

    let outcome = store.write(&consent, json!(["書面通知"])).unwrap();
    assert_eq!(outcome, EditOutcome::Locked);
    assert_eq!(store.read(&consent), Some(&json!([])));
}

#[test]
fn submit_without_management_number_is_rejected() {
    let mut store = store(ContractLine::Academic);
    store.write(&path("contractTarget.title"), json!("期刊甲")).unwrap();
    store.write(&path("basicInfo.contractParty"), json!(["甲方公司"])).unwrap();
    store.write(&path("basicInfo.contractStartDate"), json!("2024-01-01")).unwrap();
    store.write(&path("basicInfo.contractEndDate"), json!("2025-12-31")).unwrap();
    store.write(&path("rightsInfo.authorization.main"), json!("非專")).unwrap();

    let mut sink = MemorySink::default();
    assert!(!store.submit(&mut sink).unwrap());
    assert!(sink.records().is_empty());
    assert!(store.panel_visible());

    let missing = store.missing_fields();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].path, path("registrationInfo.managementNo"));
    let jump = store.jump_target(&missing[0].label).unwrap();
    assert_eq!(jump.section_id, "registration-info");

    store.write(&path("registrationInfo.managementNo"), json!("MGT-900")).unwrap();
    assert!(store.submit(&mut sink).unwrap());
    assert_eq!(sink.records().len(), 1);
    assert!(!store.panel_visible());
    assert_eq!(store.notification().map(|n| n.kind), Some(NotificationKind::Success));
}

fn add_split(store: &mut contract_forms::FormStore, beneficiary: &str, percentage: &str) {
    let mut editor = store.open_royalty_editor().unwrap();
    let scheme = editor.schemes()[0].id;
    let rule = editor.schemes()[0].volume_rules[0].id;
    let split = editor.add_split(scheme, rule).unwrap();
    editor
        .update_split(scheme, rule, split, beneficiary, percentage)
        .unwrap();
    store.commit_royalty(editor).unwrap();
}

fn remittance_names(store: &contract_forms::FormStore) -> Vec<String> {
    store
        .remittance_entries()
        .unwrap()
        .into_iter()
        .map(|entry| entry.beneficiary)
        .collect()
}

#[test]
fn remittance_follows_the_royalty_beneficiaries() {
    let mut store = store(ContractLine::Academic);
    add_split(&mut store, "A", "60");
    add_split(&mut store, "B", "40");

    assert_eq!(store.sync_remittance().unwrap(), 2);
    assert_eq!(remittance_names(&store), vec!["A", "B"]);

    assert_eq!(store.sync_remittance().unwrap(), 2);
    assert_eq!(remittance_names(&store), vec!["A", "B"]);

    let mut editor = store.open_royalty_editor().unwrap();
    let scheme = editor.schemes()[0].id;
    let rule = &editor.schemes()[0].volume_rules[0];
    let rule_id = rule.id;
    let b_split = rule
        .royalty_splits
        .iter()
        .find(|split| split.beneficiary == "B")
        .map(|split| split.id)
        .unwrap();
    assert!(editor.remove_split(scheme, rule_id, b_split).unwrap());
    store.commit_royalty(editor).unwrap();

    assert_eq!(store.sync_remittance().unwrap(), 1);
    assert_eq!(remittance_names(&store), vec!["A"]);
}

#[test]
fn cancelled_royalty_drafts_leave_the_record_alone() {
    let mut store = store(ContractLine::Academic);
    let before = store.record().clone();

    let mut editor = store.open_royalty_editor().unwrap();
    editor.add_scheme();
    drop(editor);

    assert_eq!(store.record(), &before);
}

#[test]
fn unknown_import_key_leaves_the_record_untouched() {
    let history = InMemoryHistory::with_samples().unwrap();
    let mut store = store(ContractLine::Academic);
    store.write(&path("contractTarget.title"), json!("draft")).unwrap();
    let before = serde_json::to_string(store.record()).unwrap();

    assert!(!store.import(&history, "NOPE-404"));

    assert_eq!(serde_json::to_string(store.record()).unwrap(), before);
    assert_eq!(store.notification().map(|n| n.kind), Some(NotificationKind::Error));
}

#[test]
fn known_import_key_copies_everything_but_the_reset_fields() {
    let history = InMemoryHistory::with_samples().unwrap();
    let mut store = store(ContractLine::Academic);

    assert!(store.import(&history, "  MGT-001 "));

    let record = store.record();
    assert_eq!(record.text(&path("contractTarget.title")), "範例合約一");
    assert_eq!(record.get(&path("basicInfo.contractParty")), Some(&json!(["甲方公司"])));
    assert_eq!(record.text(&path("registrationInfo.managementNo")), "");
    assert_eq!(record.text(&path("basicInfo.contractStartDate")), "");
    assert_eq!(record.text(&path("id")), "");
    assert_eq!(record.get(&path("scanFile")), Some(&json!(null)));
    assert_eq!(record.get(&path("maintenanceHistory")), Some(&json!([])));
    assert_eq!(store.royalty_schedule().unwrap()[0].volume_rules[0].royalty_splits.len(), 2);

    let original = &history.records()[0];
    assert_eq!(original.text(&path("registrationInfo.managementNo")), "MGT-001");
}

#[test]
fn a_new_notification_restarts_the_expiry_window() {
    let clock = fixed_clock();
    let mut store = store_with_clock(ContractLine::Academic, &clock);

    store.notify("first", NotificationKind::Success);
    clock.advance(Duration::seconds(4));
    store.notify("second", NotificationKind::Error);
    clock.advance(Duration::seconds(4));
    store.tick_now();
    assert_eq!(store.notification().map(|n| n.text.as_str()), Some("second"));

    clock.advance(Duration::seconds(1));
    store.tick_now();
    assert!(store.notification().is_none());
}
