//! Historical contracts used as the stand-in lookup source for import.

use serde_json::{json, Value};

use super::{
    ContractLine, ContractRecord, DateScheme, FieldPath, RemittanceEntry, RoyaltySplit,
};
use crate::errors::Result;

/// Previously saved contracts across both lines.
pub fn historical() -> Result<Vec<ContractRecord>> {
    Ok(vec![academic_sample()?, library_sample()?])
}

fn apply(record: &mut ContractRecord, entries: Vec<(&str, Value)>) -> Result<()> {
    for (raw, value) in entries {
        record.set(&FieldPath::parse(raw)?, value)?;
    }
    Ok(())
}

fn academic_sample() -> Result<ContractRecord> {
    let mut record = ContractRecord::blank(ContractLine::Academic);
    let mut scheme = DateScheme::new("2024-01-01", "2025-12-31");
    scheme.volume_rules[0].royalty_splits = vec![
        RoyaltySplit::with_beneficiary("甲方公司", "60"),
        RoyaltySplit::with_beneficiary("作者群", "40"),
    ];
    let mut remittance = RemittanceEntry::new("甲方公司");
    remittance.bank_name = "臺灣銀行".into();

    apply(
        &mut record,
        vec![
            ("id", json!("1")),
            ("contractTarget.publicationId", json!("P12345")),
            ("contractTarget.type", json!("期刊")),
            ("contractTarget.title", json!("範例合約一")),
            ("contractTarget.volumeInfo", json!("10")),
            ("contractTarget.issnIsbn", json!("978-0-12345-678-9")),
            ("registrationInfo.managementNo", json!("MGT-001")),
            ("registrationInfo.departmentNo", json!("DEP-A-001")),
            ("registrationInfo.departmentSubNo", json!("SUB-01")),
            ("registrationInfo.collector", json!("張三")),
            ("registrationInfo.asResponsible", json!("李四")),
            ("registrationInfo.isCurrent", json!("是")),
            ("basicInfo.partyARep", json!("王大明")),
            ("basicInfo.partyBRep", json!("陳小華")),
            ("basicInfo.contractParty", json!(["甲方公司"])),
            ("basicInfo.contractStartDate", json!("2024-01-01")),
            ("basicInfo.contractEndDate", json!("2025-12-31")),
            ("basicInfo.autoRenewYears", json!("1")),
            ("basicInfo.autoRenewFrequency", json!("2")),
            ("basicInfo.thereafter", json!("是")),
            ("rightsInfo.authorization", json!({ "main": "非專", "sub": "L4" })),
            ("scopeInfo.discoverySystem_platforms", json!(["Google Scholar"])),
            ("royaltyInfo", json!([scheme])),
            ("remittanceInfo", json!([remittance])),
            ("scanFile", json!("contract-mgt-001.pdf")),
            ("createdAt", json!("2024-01-01T00:00:00Z")),
            ("maintenanceHistory", json!([{ "at": "2024-03-01", "by": "12345" }])),
        ],
    )?;
    Ok(record)
}

fn library_sample() -> Result<ContractRecord> {
    let mut record = ContractRecord::blank(ContractLine::LibraryServices);
    apply(
        &mut record,
        vec![
            ("id", json!("mock-001")),
            ("registrationInfo.airitiContractNo", json!("OLD-001")),
            ("registrationInfo.ebookContractNo", json!("E-OLD-001")),
            ("registrationInfo.acquisitionMaintainer", json!("舊徵集員")),
            ("registrationInfo.asTeamMaintainer", json!("舊AS組員")),
            ("basicInfo.publisherName", json!("遠古出版社")),
            ("basicInfo.licensorPersonInCharge", json!("山頂洞人")),
            ("basicInfo.licensorRep", json!("北京猿人")),
            ("basicInfo.airitiSignatory", json!("華藝簽約代表")),
            ("basicInfo.contractTargetType", json!("ebook")),
            ("basicInfo.contractStatus", json!("yes")),
            ("basicInfo.earlyTermination", json!("no")),
            ("basicInfo.contractStartDate", json!("2020-01-01")),
            ("basicInfo.contractEndDate", json!("2024-12-31")),
            ("basicInfo.autoRenewYears", json!("2")),
            ("basicInfo.autoRenewTimes", json!("10")),
            ("basicInfo.thereafter", json!("yes")),
            ("basicInfo.contractVersionNo", json!("v0.9")),
            ("basicInfo.contractName", json!("史前合約")),
            ("basicInfo.jurisdiction", json!("台北地方法院")),
            ("rightsInfo.trialPercentage", json!({ "percentage": "10", "details": "" })),
            ("rightsInfo.fullTextDigitization", json!({ "selected": "yes", "details": "" })),
            ("rightsInfo.marketingModel", json!({ "selected": "other", "details": "依專案討論" })),
            ("rightsInfo.algorithmTraining", json!({ "selected": "no", "details": "" })),
            ("scopeInfo.b2bSalesRightsToggle", json!("yes")),
            ("scopeInfo.b2bAuthorizationType", json!("專屬")),
            ("otherClauses.amazon", json!({ "selected": "yes", "details": "" })),
            ("otherClauses.bookwalker", json!({ "selected": "no", "details": "" })),
            ("accountingInfo.accountHolderName", json!("遠古出版社有限公司")),
            ("accountingInfo.taxId", json!("12345678")),
            ("accountingInfo.bankName", json!("盤古銀行")),
            ("twBookContact.companyAddress", json!({ "postalCode": "100", "address": "台北市中正區" })),
            ("remarks", json!("這是一筆舊的合約資料，用於帶出舊資料功能展示。")),
            ("scanFile", json!("old-contract.pdf")),
            ("createdAt", json!("2020-01-01T00:00:00Z")),
        ],
    )?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_carry_their_business_keys() {
        let records = historical().unwrap();
        for record in &records {
            let key = FieldPath::parse(record.line.import_key_path()).unwrap();
            assert!(!record.text(&key).is_empty());
        }
    }
}
