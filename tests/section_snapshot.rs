mod common;

use common::{path, store};
use contract_forms::{cli::display::section_summary, ContractLine};
use insta::assert_snapshot;
use serde_json::json;

#[test]
fn contract_target_section_summary() {
    let mut store = store(ContractLine::Academic);
    store
        .write(&path("contractTarget.title"), json!("Journal of Tests"))
        .unwrap();
    store.write(&path("contractTarget.type"), json!("期刊")).unwrap();

    let summary = section_summary(&store, "contract-target").unwrap();
    assert_snapshot!("contract_target_section", summary);
}
