use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{tempdir, NamedTempFile};

fn shell(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("contract_forms_cli").unwrap();
    cmd.env("CONTRACT_FORMS_CLI_SCRIPT", "1")
        .env("CONTRACT_FORMS_HOME", home)
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_fills_and_submits_a_contract() {
    let home = tempdir().unwrap();
    let export = NamedTempFile::new().unwrap();
    let input = format!(
        "login 12345\n\
         open academic\n\
         set contractTarget.title 'Journal of Tests'\n\
         tag basicInfo.contractParty add 甲方公司\n\
         set basicInfo.contractStartDate 2024-01-01\n\
         set basicInfo.contractEndDate 2025-12-31\n\
         set rightsInfo.authorization.main 非專\n\
         submit\n\
         set registrationInfo.managementNo MGT-900\n\
         split 甲方公司 100\n\
         sync-remittance\n\
         submit\n\
         export {}\n\
         exit\n",
        export.path().display()
    );

    shell(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Required fields are missing"))
        .stdout(contains("管理編號 (registration-info > registrationInfo.managementNo)"))
        .stdout(contains("Synced 1 beneficiaries"))
        .stdout(contains("Contract saved"));

    let json = std::fs::read_to_string(export.path()).unwrap();
    assert!(json.contains("\"MGT-900\""));
    assert!(home.path().join("submitted").join("academic-MGT-900.json").exists());

    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("last_export_path"));
}

#[test]
fn script_mode_suggests_close_commands() {
    let home = tempdir().unwrap();
    shell(home.path())
        .write_stdin("opne academic\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `opne`"))
        .stdout(contains("Suggestion: `open`?"));
}

#[test]
fn script_mode_rejects_unknown_employees() {
    let home = tempdir().unwrap();
    shell(home.path())
        .write_stdin("login 99999\nopen academic\nexit\n")
        .assert()
        .success()
        .stdout(contains("User not found"))
        .stdout(contains("Not logged in"));
}
