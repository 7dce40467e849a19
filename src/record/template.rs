//! Blank record templates. Every path a catalog descriptor names must exist here.

use serde_json::{json, Map, Value};

use super::{ContactRow, ContractLine, DateScheme};
use crate::catalog::library::{PLATFORM_GRID, RIGHTS_TABLE};

/// Returns a freshly generated blank record for `line`.
pub fn blank(line: ContractLine) -> Value {
    match line {
        ContractLine::Academic => academic(),
        ContractLine::LibraryServices => library_services(),
    }
}

fn choice() -> Value {
    json!({ "selected": "", "details": "" })
}

fn percentage() -> Value {
    json!({ "percentage": "", "details": "" })
}

fn to_value<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn academic() -> Value {
    json!({
        "id": "",
        "contractTarget": {
            "publicationId": "", "type": "", "title": "", "volumeInfo": "", "issnIsbn": ""
        },
        "registrationInfo": {
            "managementNo": "", "departmentNo": "", "departmentSubNo": "", "collector": "",
            "asResponsible": "", "isCurrent": "否", "contractVersion": [], "nonAiritiVersion": ""
        },
        "basicInfo": {
            "partyARep": "", "partyBRep": "", "contractParty": [], "contractStartDate": "",
            "contractEndDate": "", "autoRenewYears": "", "autoRenewFrequency": "",
            "thereafter": "否", "specialDateInfo": ""
        },
        "rightsInfo": {
            "authorization": { "main": "", "sub": "" },
            "paymentType": "有償",
            "isOpenAccess": "無"
        },
        "scopeInfo": {
            "thirdPartyPlatform_tws": "上_TWS",
            "thirdPartyPlatform_consent": [],
            "discoverySystem_selectionType": "單選",
            "discoverySystem_futurePlatforms": "含將來合作平台",
            "discoverySystem_includeCN": "含CN",
            "discoverySystem_platforms": [],
            "discoverySystem_consent": [],
            "comparisonSystem": "否",
            "nclClause_selectionType": "不上",
            "nclClause_doNotList": [],
            "nclClause_embargoRules": [],
            "listingLocation": "全球用戶",
            "status_al_cn": ""
        },
        "otherClauses": {
            "usageRightsWarranty": "保證+甲方賠償", "userRightsProtection": "否",
            "terminationClause": "否", "forceMajeure": "否", "confidentiality": "否",
            "noOaOnOwnWebsite": "否", "legalIssueHandling": "雙方",
            "manuscriptAgreementMention": "否", "authorizationCopy": "否",
            "damages_hasClause": "否", "damages_description": ""
        },
        "terminationInfo": {
            "isTerminated": "否", "terminationReason": "", "terminationDate": "",
            "terminationMethod": ""
        },
        "royaltyInfo": [to_value(DateScheme::blank())],
        "remittanceInfo": [],
        "remarks": "",
        "scanFile": null,
        "createdAt": null,
        "maintenanceHistory": []
    })
}

fn library_services() -> Value {
    let mut rights = Map::new();
    rights.insert("trialPercentage".into(), percentage());
    rights.insert("printingPercentage".into(), percentage());
    for (key, _) in RIGHTS_TABLE {
        rights.insert(key.to_string(), choice());
    }
    rights.insert("doiApplication".into(), json!(""));
    rights.insert("doiFee".into(), json!(""));

    let mut clauses = Map::new();
    for (key, value) in [
        ("b2cSalesRightsToggle", json!("no")),
        ("b2cAuthorizationType", json!("")),
        ("b2cSplitPercentage", percentage()),
        ("b2cSalesRegion", json!("")),
        ("b2cQuotationPrinciple", json!("")),
        ("b2cRoyaltyAdjustment", json!("")),
        ("b2cPricingPower", json!("")),
        ("b2cLease", choice()),
        ("b2cBuyout", choice()),
        ("b2cPayPerUse", choice()),
        ("b2cVariablePriceAuth", choice()),
        ("shuNiuXiong", choice()),
        ("kingstone", choice()),
        ("sanmin", choice()),
        ("trmsSalesRightsToggle", json!("no")),
        ("trmsSplitPercentage", percentage()),
        ("distributorPlatformToggle", json!("no")),
        ("distributorSplit", percentage()),
        ("cannotListPlatforms", json!("")),
    ] {
        clauses.insert(key.to_string(), value);
    }
    for (key, _) in PLATFORM_GRID {
        clauses.insert(key.to_string(), choice());
    }

    json!({
        "id": "",
        "registrationInfo": {
            "airitiContractNo": "", "ebookContractNo": "", "acquisitionMaintainer": "",
            "asTeamMaintainer": ""
        },
        "basicInfo": {
            "publisherName": "", "licensorPersonInCharge": "", "licensorRep": "",
            "airitiSignatory": "", "contractTargetType": "", "contractStatus": "",
            "earlyTermination": "", "contractStartDate": "", "contractEndDate": "",
            "autoRenewYears": "", "autoRenewTimes": "", "thereafter": "",
            "contractVersionNo": "", "contractName": "", "specialPenalties": "",
            "jurisdiction": ""
        },
        "rightsInfo": Value::Object(rights),
        "scopeInfo": {
            "b2bSalesRightsToggle": "no", "b2bAuthorizationType": "",
            "b2bSplitPercentage": percentage(), "b2bSalesRegion": "", "b2bMinMultiple": "",
            "b2bRoyaltyAdjustment": "", "b2bPricingPower": "",
            "b2bLease": choice(), "b2bBuyout": choice(), "b2bPayPerUse": choice(),
            "b2bPda": choice(), "b2bAlliance": choice(), "b2bPublicTender": choice(),
            "b2bRestrictiveTender": choice(),
            "subscription": "", "eLibrarySalesRight": "", "eLibraryContractType": "",
            "eLibrarySplit": percentage(), "eLibraryPricing": ""
        },
        "otherClauses": Value::Object(clauses),
        "accountingInfo": {
            "entityType": "", "locationType": "", "billingCycle": "", "paymentTerm": "",
            "paymentMethod": "", "accountHolderName": "", "taxId": "", "idNumber": "",
            "bankName": "", "branchName": "", "bankCode": "", "branchCode": "",
            "accountNumber": "", "swiftCode": "", "bankAddress": "", "remittanceNotes": ""
        },
        "twBookContact": {
            "publisherRegion": "",
            "contacts": [to_value(ContactRow::new())],
            "companyAddress": { "postalCode": "", "address": "" },
            "logisticsAddress": { "postalCode": "", "address": "" }
        },
        "remarks": "",
        "scanFile": null,
        "createdAt": null,
        "maintenanceHistory": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn academic_template_starts_with_one_blank_scheme() {
        let record = blank(ContractLine::Academic);
        let schedule = record["royaltyInfo"].as_array().unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0]["startDate"], "");
        assert_eq!(record["remittanceInfo"], json!([]));
    }

    #[test]
    fn library_template_contains_every_bulk_item() {
        let record = blank(ContractLine::LibraryServices);
        for (key, _) in RIGHTS_TABLE {
            assert_eq!(record["rightsInfo"][key], choice(), "rights item {key}");
        }
        for (key, _) in PLATFORM_GRID {
            assert_eq!(record["otherClauses"][key], choice(), "platform item {key}");
        }
    }

    #[test]
    fn templates_are_generated_fresh() {
        let a = blank(ContractLine::Academic);
        let b = blank(ContractLine::Academic);
        assert_ne!(a["royaltyInfo"][0]["id"], b["royaltyInfo"][0]["id"]);
    }
}
