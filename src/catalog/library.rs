//! Catalog for Library Services contracts, including the two bulk-apply tables.

use super::{
    BulkGroup, CatalogDefinition, CompositeKind, FieldDescriptor, Section, SectionFields, Visibility,
};
use crate::record::{literal_path, ContractRecord};

pub const YES_NO: &[&str] = &["yes", "no"];
pub const TARGET_TYPES: &[&str] = &["ebook", "print", "both"];
pub const AUTHORIZATION_TYPES: &[&str] = &["專屬", "非專屬"];
pub const DOI_APPLICANTS: &[&str] = &["by Airiti", "by 出版社"];
pub const ENTITY_TYPES: &[&str] = &["private", "company"];
pub const LOCATION_TYPES: &[&str] = &["domestic", "overseas"];
pub const E_LIBRARY_CONTRACT_TYPES: &[&str] = &["包庫", "單本"];

/// Rights that share the rights-table bulk selector.
pub const RIGHTS_TABLE: [(&str, &str); 24] = [
    ("fullTextDigitization", "全文數位化"),
    ("trialAccess", "試閱"),
    ("tts", "語音朗讀"),
    ("fullTextSearch", "全文檢索"),
    ("dataComparison", "資料比對"),
    ("systemData", "系統資料"),
    ("captureAnalysisProcessing", "擷取分析處理"),
    ("autoGeneration", "自動生成"),
    ("algorithmTraining", "演算法訓練"),
    ("languageSwitching", "語言轉換"),
    ("chapterPresentation", "章節呈現"),
    ("chapterSales", "章節銷售"),
    ("marketingModel", "行銷模式"),
    ("publisherSpecs", "出版社規格"),
    ("thirdPartyAuthorization", "第三方授權"),
    ("thirdPartyConsignment", "第三方委託"),
    ("salesChannels", "銷售通路"),
    ("paymentMethodRights", "付款方式"),
    ("listingSchedule", "上架時程"),
    ("listingItems", "上架品項"),
    ("listingPlatforms", "上架平台"),
    ("tradingConditions", "交易條件"),
    ("contentPresentation", "內容呈現"),
    ("serviceModel", "服務模式"),
];

/// Distribution platforms that share the platform-grid bulk selector.
pub const PLATFORM_GRID: [(&str, &str); 22] = [
    ("amazon", "Amazon"),
    ("google", "Google Play"),
    ("kobo", "Kobo"),
    ("pubu", "Pubu"),
    ("eslite", "誠品"),
    ("pchome", "PChome"),
    ("readmoo", "Readmoo"),
    ("udn", "UDN讀書吧"),
    ("bookwalker", "BookWalker"),
    ("hyweb", "凌網"),
    ("bookscom", "博客來"),
    ("apple", "Apple Books"),
    ("mybook", "MyBook"),
    ("momo", "momo"),
    ("twb", "台灣雲端書庫"),
    ("hkUe", "香港UE"),
    ("taaze", "讀冊"),
    ("ingram", "Ingram"),
    ("overdrive", "OverDrive"),
    ("hami", "Hami書城"),
    ("truth", "真理"),
    ("wechat", "微信讀書"),
];

pub const RIGHTS_GROUP: &str = "rights";
pub const PLATFORM_GROUP: &str = "platforms";

pub const REQUIRED_FIELDS: &[&str] = &[
    "registrationInfo.airitiContractNo",
    "basicInfo.publisherName",
    "basicInfo.contractStartDate",
    "basicInfo.contractEndDate",
    "accountingInfo.accountHolderName",
    "twBookContact.companyAddress.postalCode",
];

fn yes(record: &ContractRecord, raw: &str) -> bool {
    record.text(&literal_path(raw)) == "yes"
}

fn b2b_enabled(record: &ContractRecord) -> bool {
    yes(record, "scopeInfo.b2bSalesRightsToggle")
}

fn e_library_enabled(record: &ContractRecord) -> bool {
    yes(record, "scopeInfo.eLibrarySalesRight")
}

fn b2c_enabled(record: &ContractRecord) -> bool {
    yes(record, "otherClauses.b2cSalesRightsToggle")
}

fn trms_enabled(record: &ContractRecord) -> bool {
    yes(record, "otherClauses.trmsSalesRightsToggle")
}

fn distributor_enabled(record: &ContractRecord) -> bool {
    yes(record, "otherClauses.distributorPlatformToggle")
}

fn overseas_account(record: &ContractRecord) -> bool {
    record.text(&literal_path("accountingInfo.locationType")) == "overseas"
}

fn table(fields: &SectionFields, items: &[(&'static str, &'static str)]) -> Vec<FieldDescriptor> {
    items
        .iter()
        .map(|&(key, label)| fields.with_other(key, label))
        .collect()
}

pub fn definition() -> CatalogDefinition {
    let registration = SectionFields::under("registrationInfo");
    let basic = SectionFields::under("basicInfo");
    let rights = SectionFields::under("rightsInfo");
    let scope = SectionFields::under("scopeInfo");
    let clauses = SectionFields::under("otherClauses");
    let accounting = SectionFields::under("accountingInfo");
    let contact = SectionFields::under("twBookContact");
    let root = SectionFields::root();

    let mut rights_fields = vec![
        rights.percentage("trialPercentage", "試閱比例"),
        rights.percentage("printingPercentage", "列印比例"),
    ];
    rights_fields.extend(table(&rights, &RIGHTS_TABLE));
    rights_fields.push(rights.choice("doiApplication", "DOI申請", DOI_APPLICANTS));
    rights_fields.push(rights.text("doiFee", "DOI費用"));

    let mut b2b_fields = vec![
        scope.choice("b2bSalesRightsToggle", "B2B銷售權", YES_NO),
        scope.choice("b2bAuthorizationType", "B2B授權類型", AUTHORIZATION_TYPES),
        scope.percentage("b2bSplitPercentage", "B2B分潤比例"),
        scope.text("b2bSalesRegion", "B2B銷售地區"),
        scope.text("b2bMinMultiple", "B2B最低倍數"),
        scope.choice("b2bRoyaltyAdjustment", "B2B權利金調整", YES_NO),
        scope.choice("b2bPricingPower", "B2B定價權", YES_NO),
        scope.with_other("b2bLease", "租賃"),
        scope.with_other("b2bBuyout", "買斷"),
        scope.with_other("b2bPayPerUse", "按次計費"),
        scope.with_other("b2bPda", "PDA"),
        scope.with_other("b2bAlliance", "聯盟"),
        scope.with_other("b2bPublicTender", "公開招標"),
        scope.with_other("b2bRestrictiveTender", "限制性招標"),
    ];
    for field in b2b_fields.iter_mut().skip(1) {
        field.visibility = Some(b2b_enabled as Visibility);
    }
    b2b_fields.extend([
        scope.choice("subscription", "訂閱制", YES_NO),
        scope.choice("eLibrarySalesRight", "電子圖書館銷售權", YES_NO),
        scope
            .choice("eLibraryContractType", "電子圖書館合約類型", E_LIBRARY_CONTRACT_TYPES)
            .visible_when(e_library_enabled),
        scope
            .percentage("eLibrarySplit", "電子圖書館分潤")
            .visible_when(e_library_enabled),
        scope
            .text("eLibraryPricing", "電子圖書館定價")
            .visible_when(e_library_enabled),
    ]);

    let mut b2c_fields = vec![
        clauses.choice("b2cSalesRightsToggle", "B2C銷售權", YES_NO),
        clauses.choice("b2cAuthorizationType", "B2C授權類型", AUTHORIZATION_TYPES),
        clauses.percentage("b2cSplitPercentage", "B2C分潤比例"),
        clauses.text("b2cSalesRegion", "B2C銷售地區"),
        clauses.text("b2cQuotationPrinciple", "報價原則"),
        clauses.choice("b2cRoyaltyAdjustment", "B2C權利金調整", YES_NO),
        clauses.choice("b2cPricingPower", "B2C定價權", YES_NO),
        clauses.with_other("b2cLease", "租賃"),
        clauses.with_other("b2cBuyout", "買斷"),
        clauses.with_other("b2cPayPerUse", "按次計費"),
        clauses.with_other("b2cVariablePriceAuth", "變價授權"),
        clauses.with_other("shuNiuXiong", "書紐熊"),
        clauses.with_other("kingstone", "金石堂"),
        clauses.with_other("sanmin", "三民"),
    ];
    for field in b2c_fields.iter_mut().skip(1) {
        field.visibility = Some(b2c_enabled as Visibility);
    }
    b2c_fields.extend([
        clauses.choice("trmsSalesRightsToggle", "TRMS銷售權", YES_NO),
        clauses
            .percentage("trmsSplitPercentage", "TRMS分潤比例")
            .visible_when(trms_enabled),
        clauses.choice("distributorPlatformToggle", "經銷平台", YES_NO),
        clauses
            .percentage("distributorSplit", "經銷分潤比例")
            .visible_when(distributor_enabled),
        clauses
            .text("cannotListPlatforms", "不可上架平台")
            .visible_when(distributor_enabled),
    ]);
    b2c_fields.extend(
        table(&clauses, &PLATFORM_GRID)
            .into_iter()
            .map(|field| field.visible_when(distributor_enabled)),
    );

    let sections = vec![
        Section::new(
            "registration-info",
            "造冊資訊",
            vec![
                registration.text("airitiContractNo", "華藝合約編號"),
                registration.text("ebookContractNo", "電子書合約編號"),
                registration.text("acquisitionMaintainer", "徵集維護人員"),
                registration.text("asTeamMaintainer", "AS組維護人員"),
            ],
        ),
        Section::new(
            "basic-info",
            "基本資料",
            vec![
                basic.choice("contractTargetType", "合約標的類型", TARGET_TYPES),
                basic.choice("contractStatus", "合約狀態", YES_NO),
                basic.choice("earlyTermination", "提前解約", YES_NO),
                basic.text("publisherName", "出版社名稱"),
                basic.text("licensorPersonInCharge", "授權方負責人"),
                basic.text("licensorRep", "授權方代表"),
                basic.text("airitiSignatory", "華藝簽約代表"),
                basic.date("contractStartDate", "合約起日"),
                basic.date("contractEndDate", "合約迄日"),
                basic.text("autoRenewYears", "自動續約年數"),
                basic.text("autoRenewTimes", "自動續約次數"),
                basic.choice("thereafter", "其後亦同", YES_NO),
                basic.text("contractVersionNo", "合約版本號"),
                basic.text("contractName", "合約名稱"),
                basic.text_area("specialPenalties", "特殊罰則"),
                basic.text("jurisdiction", "管轄法院"),
            ],
        ),
        Section::new("rights-info", "權利內容", rights_fields),
        Section::new("scope-info", "B2B授權範圍", b2b_fields),
        Section::new("other-clauses", "B2C與平台條款", b2c_fields),
        Section::new(
            "accounting-info",
            "帳務資料",
            vec![
                accounting.choice("entityType", "主體類型", ENTITY_TYPES),
                accounting.choice("locationType", "帳戶地區", LOCATION_TYPES),
                accounting.text("billingCycle", "結帳週期"),
                accounting.text("paymentTerm", "付款條件"),
                accounting.text("paymentMethod", "付款方式"),
                accounting.text("idNumber", "身分證字號"),
                accounting.text("accountHolderName", "戶名"),
                accounting.text("taxId", "統一編號"),
                accounting.text("bankName", "銀行名稱"),
                accounting.text("bankCode", "銀行代碼"),
                accounting.text("branchName", "分行名稱"),
                accounting.text("branchCode", "分行代碼"),
                accounting.text("accountNumber", "帳號"),
                accounting
                    .text("swiftCode", "SWIFT代碼")
                    .visible_when(overseas_account),
                accounting
                    .text("bankAddress", "銀行地址")
                    .visible_when(overseas_account),
                accounting.text_area("remittanceNotes", "匯款備註"),
            ],
        ),
        Section::new(
            "tw-book-contact",
            "聯絡資訊",
            vec![
                contact.text("publisherRegion", "出版社地區"),
                contact.composite("contacts", "聯絡人", CompositeKind::Contacts),
                contact.group(
                    "companyAddress",
                    "公司地址",
                    &[("postalCode", "郵遞區號"), ("address", "地址")],
                ),
                contact.group(
                    "logisticsAddress",
                    "物流地址",
                    &[("postalCode", "郵遞區號"), ("address", "地址")],
                ),
            ],
        ),
        Section::new("remarks", "備註", vec![root.text_area("remarks", "備註")]),
        Section::new(
            "scan-file",
            "合約掃描檔",
            vec![root.composite("scanFile", "合約掃描檔", CompositeKind::ScanFile)],
        ),
    ];

    CatalogDefinition {
        sections,
        required: REQUIRED_FIELDS.to_vec(),
        bulk_groups: vec![
            BulkGroup::new(RIGHTS_GROUP, "權利項目", "rightsInfo", &RIGHTS_TABLE),
            BulkGroup::new(PLATFORM_GROUP, "經銷平台", "otherClauses", &PLATFORM_GRID),
        ],
    }
}
