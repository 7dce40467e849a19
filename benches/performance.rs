use std::hint::black_box;

use contract_forms::{
    catalog::Catalog,
    form::{validate, FormStore},
    ContractLine, ContractRecord, FieldPath,
};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

fn bench_path_writes(c: &mut Criterion) {
    let title = FieldPath::parse("contractTarget.title").unwrap();
    let start = FieldPath::parse("basicInfo.contractStartDate").unwrap();

    c.bench_function("record.set.in_place", |b| {
        let mut record = ContractRecord::blank(ContractLine::Academic);
        b.iter(|| record.set(black_box(&title), json!("Journal")).unwrap());
    });

    c.bench_function("record.with.copy_on_write", |b| {
        let record = ContractRecord::blank(ContractLine::Academic);
        b.iter(|| black_box(record.with(&title, json!("Journal")).unwrap()));
    });

    c.bench_function("store.write.with_auto_fill", |b| {
        let mut store = FormStore::new(ContractLine::Academic).unwrap();
        b.iter(|| store.write(black_box(&start), json!("2024-01-01")).unwrap());
    });
}

fn bench_validation(c: &mut Criterion) {
    for line in ContractLine::ALL {
        let catalog = Catalog::load(line).unwrap();
        let record = ContractRecord::blank(line);
        c.bench_function(&format!("validate.blank.{}", line.slug()), |b| {
            b.iter(|| black_box(validate(&record, catalog.required_rules())));
        });
    }
}

criterion_group!(benches, bench_path_writes, bench_validation);
criterion_main!(benches);
