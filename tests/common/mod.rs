#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use contract_forms::{
    form::{FormStore, ManualClock},
    init, ContractLine, FieldPath,
};

pub fn path(raw: &str) -> FieldPath {
    FieldPath::parse(raw).expect("valid path")
}

/// A clock pinned to 2024-06-01 00:00 UTC.
pub fn fixed_clock() -> ManualClock {
    ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
}

/// A blank form for `line` driven by `clock`.
pub fn store_with_clock(line: ContractLine, clock: &ManualClock) -> FormStore {
    init();
    FormStore::new(line)
        .expect("catalog loads")
        .with_clock(clock.clone())
}

pub fn store(line: ContractLine) -> FormStore {
    store_with_clock(line, &fixed_clock())
}
