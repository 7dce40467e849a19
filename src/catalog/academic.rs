//! Catalog for Academic contracts.

use super::{BulkGroup, CatalogDefinition, CompositeKind, FieldKind, Section, SectionFields};
use crate::record::{literal_path, ContractRecord};

pub const YES_NO: &[&str] = &["是", "否"];
pub const PUBLICATION_TYPES: &[&str] = &["期刊", "論文集", "電子書"];
pub const PAYMENT_TYPES: &[&str] = &["有償", "無償"];
pub const OPEN_ACCESS: &[&str] = &["有", "無"];
pub const LISTING_LOCATIONS: &[&str] = &["全球用戶", "不上CN", "不上CN含港澳"];
pub const WARRANTY_OPTIONS: &[&str] = &["保證+甲方賠償", "保證+甲方不賠", "未保證"];
pub const LEGAL_HANDLING: &[&str] = &["甲方", "乙方", "雙方", "法律解決"];

pub const AUTHORIZATION_FORMS: &[(&str, &[&str])] = &[
    ("非專", &["L4", "L4臺大方案一", "L5-1", "L5-1臺大方案二", "L5", "L5臺大方案三"]),
    ("專屬", &["L1", "L3"]),
    ("獨家", &["L2"]),
    ("共出編輯", &[]),
    ("共同出版", &[]),
    ("亞東專屬", &[]),
];

pub const REQUIRED_FIELDS: &[&str] = &[
    "contractTarget.title",
    "registrationInfo.managementNo",
    "basicInfo.contractParty",
    "basicInfo.contractStartDate",
    "basicInfo.contractEndDate",
    "rightsInfo.authorization.main",
];

fn is_terminated(record: &ContractRecord) -> bool {
    record.text(&literal_path("terminationInfo.isTerminated")) == "是"
}

pub fn definition() -> CatalogDefinition {
    let target = SectionFields::under("contractTarget");
    let registration = SectionFields::under("registrationInfo");
    let termination = SectionFields::under("terminationInfo");
    let basic = SectionFields::under("basicInfo");
    let rights = SectionFields::under("rightsInfo");
    let scope = SectionFields::under("scopeInfo");
    let clauses = SectionFields::under("otherClauses");
    let root = SectionFields::root();

    let sections = vec![
        Section::new(
            "contract-target",
            "合約標的",
            vec![
                target.text("title", "刊名"),
                target.text("publicationId", "Publication ID"),
                target.choice("type", "類型", PUBLICATION_TYPES),
                target.text("volumeInfo", "卷期"),
                target.text("issnIsbn", "ISSN/ISBN"),
            ],
        ),
        Section::new(
            "registration-info",
            "造冊資訊",
            vec![
                registration.text("managementNo", "管理編號"),
                registration.text("departmentNo", "部門編號"),
                registration.text("departmentSubNo", "部門子編號"),
                registration.text("collector", "徵集負責人"),
                registration.text("asResponsible", "AS負責人"),
                registration.choice("isCurrent", "是否為最新合約", YES_NO),
                registration.tags("contractVersion", "合約版本"),
                registration.text("nonAiritiVersion", "非華藝版本"),
            ],
        ),
        Section::new(
            "termination-info",
            "解約",
            vec![
                termination.choice("isTerminated", "是否解約", YES_NO),
                termination
                    .text_area("terminationReason", "解約原因")
                    .visible_when(is_terminated),
                termination
                    .date("terminationDate", "解約日期")
                    .visible_when(is_terminated),
                termination
                    .text("terminationMethod", "解約方式")
                    .visible_when(is_terminated),
            ],
        ),
        Section::new(
            "basic-info",
            "基本資料",
            vec![
                basic.text("partyARep", "甲方代表"),
                basic.text("partyBRep", "乙方代表"),
                basic.tags("contractParty", "簽約單位"),
                basic.date("contractStartDate", "合約起日"),
                basic.date("contractEndDate", "合約迄日"),
                basic.text("autoRenewYears", "自動續約年數"),
                basic.text("autoRenewFrequency", "自動續約次數"),
                basic.choice("thereafter", "其後亦同", YES_NO),
                basic.text_area("specialDateInfo", "特殊日期說明"),
            ],
        ),
        Section::new(
            "rights-info",
            "權利內容",
            vec![
                rights.field(
                    "authorization",
                    "授權形式",
                    FieldKind::Cascading(AUTHORIZATION_FORMS),
                ),
                rights.choice("paymentType", "有償/無償", PAYMENT_TYPES),
                rights.choice("isOpenAccess", "是否OA", OPEN_ACCESS),
            ],
        ),
        Section::new(
            "royalty-info",
            "權利金比例",
            vec![root.composite("royaltyInfo", "權利金規則", CompositeKind::RoyaltySchedule)],
        ),
        Section::new(
            "scope-info",
            "授權範圍",
            vec![
                scope.composite(
                    "thirdPartyPlatform_tws",
                    "第三方平台",
                    CompositeKind::ThirdPartyPlatform,
                ),
                scope.composite(
                    "discoverySystem_selectionType",
                    "探索系統",
                    CompositeKind::DiscoverySystem,
                ),
                scope.choice("comparisonSystem", "比對系統", YES_NO),
                scope.composite("nclClause_selectionType", "國圖條款", CompositeKind::NclClause),
                scope.choice("listingLocation", "上架地區", LISTING_LOCATIONS),
                scope.text("status_al_cn", "AL/CN 狀態"),
            ],
        ),
        Section::new(
            "other-clauses",
            "其他條款",
            vec![
                clauses.choice("usageRightsWarranty", "使用權利擔保", WARRANTY_OPTIONS),
                clauses.choice("userRightsProtection", "使用者權益保障", YES_NO),
                clauses.choice("terminationClause", "終止條款", YES_NO),
                clauses.choice("forceMajeure", "不可抗力", YES_NO),
                clauses.choice("confidentiality", "保密條款", YES_NO),
                clauses.choice("noOaOnOwnWebsite", "自有網站不得OA", YES_NO),
                clauses.choice("legalIssueHandling", "法律問題處理", LEGAL_HANDLING),
                clauses.choice("manuscriptAgreementMention", "稿約提及", YES_NO),
                clauses.choice("authorizationCopy", "授權書影本", YES_NO),
                clauses.composite("damages_hasClause", "損害賠償", CompositeKind::Damages),
            ],
        ),
        Section::new(
            "remittance-info",
            "匯款資料",
            vec![root.composite("remittanceInfo", "匯款資料", CompositeKind::Remittance)],
        ),
        Section::new(
            "scan-file",
            "合約掃描檔",
            vec![root.composite("scanFile", "合約掃描檔", CompositeKind::ScanFile)],
        ),
        Section::new("remarks", "備註", vec![root.text_area("remarks", "備註")]),
    ];

    CatalogDefinition {
        sections,
        required: REQUIRED_FIELDS.to_vec(),
        bulk_groups: Vec::<BulkGroup>::new(),
    }
}
