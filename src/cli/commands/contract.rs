use std::path::PathBuf;

use crate::cli::commands::{arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::record::{ContractRecord, FieldPath};
use crate::utils::{app_data_dir, persistence};

const SUBMITTED_DIR: &str = "submitted";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "split",
            "Add a royalty split to the first scheme",
            "split <beneficiary> <percentage>",
            cmd_split,
        ),
        CommandDefinition::new(
            "sync-remittance",
            "Match remittance entries to royalty beneficiaries",
            "sync-remittance",
            cmd_sync_remittance,
        ),
        CommandDefinition::new(
            "import",
            "Copy a prior contract into the form",
            "import <key>",
            cmd_import,
        ),
        CommandDefinition::new(
            "attach",
            "Record the scanned contract file name",
            "attach <file>",
            cmd_attach,
        ),
        CommandDefinition::new(
            "submit",
            "Validate and save the contract",
            "submit",
            cmd_submit,
        ),
        CommandDefinition::new(
            "export",
            "Write the current record to a JSON file",
            "export <file>",
            cmd_export,
        ),
    ]
}

fn cmd_split(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "split <beneficiary> <percentage>";
    let beneficiary = arg(args, 0, usage)?;
    let percentage = arg(args, 1, usage)?;

    let store = context.store_mut()?;
    let mut editor = store.open_royalty_editor()?;
    let first_scheme = editor.schemes().first().map(|scheme| scheme.id);
    let scheme_id = match first_scheme {
        Some(id) => id,
        None => editor.add_scheme(),
    };
    let first_rule = editor
        .schemes()
        .iter()
        .find(|scheme| scheme.id == scheme_id)
        .and_then(|scheme| scheme.volume_rules.first())
        .map(|rule| rule.id);
    let rule_id = match first_rule {
        Some(id) => id,
        None => editor.add_rule(scheme_id)?,
    };
    let split_id = editor.add_split(scheme_id, rule_id)?;
    editor.update_split(scheme_id, rule_id, split_id, beneficiary, percentage)?;
    store.commit_royalty(editor)?;
    output::success(format!("Added {percentage}% for {beneficiary}."));
    Ok(())
}

fn cmd_sync_remittance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.store_mut()?.sync_remittance()?;
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = args.join(" ");
    let ShellContext { store, history, .. } = context;
    let store = store.as_mut().ok_or(CommandError::NoFormOpen)?;
    store.import(&*history, &key);
    Ok(())
}

fn cmd_attach(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let file = arg(args, 0, "attach <file>")?;
    let store = context.store_mut()?;
    store.attach_scan_file(file)?;
    output::success(format!("Scan file: {}", store.scan_file_label()));
    Ok(())
}

/// File name for a submitted record, derived from its business key.
fn submission_path(record: &ContractRecord) -> Result<PathBuf, CommandError> {
    let key_path = FieldPath::parse(record.line.import_key_path())?;
    let key: String = record
        .text(&key_path)
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    Ok(app_data_dir()
        .join(SUBMITTED_DIR)
        .join(format!("{}-{key}.json", record.line.slug())))
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store_mut()?;
    let mut sink = persistence::JsonFileSink::new(submission_path(store.record())?);
    if store.submit(&mut sink)? {
        output::info(format!("Saved to {}", sink.path().display()));
        return Ok(());
    }

    output::error("Required fields are missing:");
    for missing in store.missing_fields() {
        let section = store
            .jump_target(&missing.label)
            .map(|target| target.section_id)
            .unwrap_or("?");
        output::line(format!("  {} ({section} > {})", missing.label, missing.path));
    }
    store.dismiss_panel();
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let file = match args.first() {
        Some(file) => (*file).to_string(),
        None => context.config.last_export_path.clone().ok_or_else(|| {
            CommandError::InvalidArguments("usage: export <file>".into())
        })?,
    };
    persistence::save_record(context.store()?.record(), &PathBuf::from(&file))?;
    output::success(format!("Exported record to {file}"));

    context.config.last_export_path = Some(file);
    context.persist_config()
}
