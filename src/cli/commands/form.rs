use serde_json::Value;

use crate::cli::commands::{arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{display, output};
use crate::form::{BulkChoice, EditOutcome, FieldEdit, TagKey};
use crate::record::{ContractLine, FieldPath};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "open",
            "Open a blank contract form",
            "open [academic|library]",
            cmd_open,
        ),
        CommandDefinition::new("sections", "List the form's sections", "sections", cmd_sections),
        CommandDefinition::new(
            "fields",
            "List the fields declared for a section",
            "fields <section>",
            cmd_fields,
        ),
        CommandDefinition::new("show", "Show a section's current values", "show <section>", cmd_show),
        CommandDefinition::new("get", "Print the value at a path", "get <path>", cmd_get),
        CommandDefinition::new(
            "set",
            "Write a value at a path (JSON when it starts with [ or {)",
            "set <path> <value>",
            cmd_set,
        ),
        CommandDefinition::new(
            "tag",
            "Add or remove a tag on a multi-value field",
            "tag <path> add|remove <value>",
            cmd_tag,
        ),
        CommandDefinition::new(
            "toggle",
            "Check or uncheck a checkbox option",
            "toggle <path> <option> on|off",
            cmd_toggle,
        ),
        CommandDefinition::new(
            "choose",
            "Pick yes/no/other on a choice field, with optional details",
            "choose <path> <yes|no|other> [details]",
            cmd_choose,
        ),
        CommandDefinition::new(
            "bulk",
            "Apply one choice to every field in a bulk group",
            "bulk <group> <yes|no|other|clear>",
            cmd_bulk,
        ),
    ]
}

fn parse_path(raw: &str) -> Result<FieldPath, CommandError> {
    Ok(FieldPath::parse(raw)?)
}

fn report_outcome(outcome: EditOutcome, path: &FieldPath) {
    match outcome {
        EditOutcome::Applied => output::success(format!("Updated `{path}`.")),
        EditOutcome::Locked => output::warning(format!("`{path}` is locked; edit ignored.")),
    }
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let line = match args.first() {
        Some(raw) => ContractLine::from_slug(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown contract line `{raw}`"))
        })?,
        None => context.config.default_line,
    };
    context.open_form(line)?;
    output::success(format!("Opened a blank {line} contract."));
    Ok(())
}

fn cmd_sections(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store()?;
    output::section(format!("{} sections", store.line()));
    for summary in store.catalog().sections_in_order() {
        output::line(format!("  {:<20} {}", summary.id, summary.label));
    }
    Ok(())
}

fn cmd_fields(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let section = arg(args, 0, "fields <section>")?;
    let store = context.store()?;
    let required: Vec<&FieldPath> = store
        .catalog()
        .required_rules()
        .iter()
        .map(|rule| &rule.path)
        .collect();
    output::section(format!("Fields in `{section}`"));
    for descriptor in store.catalog().fields_for(section)? {
        let marker = if required.contains(&&descriptor.path) { "*" } else { " " };
        let options = descriptor.options();
        let options = if options.is_empty() {
            String::new()
        } else {
            format!(" [{}]", options.join("|"))
        };
        output::line(format!(
            " {marker}{:<40} {} ({}){options}",
            descriptor.path.as_str(),
            descriptor.label,
            descriptor.kind.name()
        ));
    }
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let section = arg(args, 0, "show <section>")?;
    let store = context.store()?;
    let label = store
        .catalog()
        .section(section)
        .map(|section| section.label)
        .unwrap_or(section);
    let summary = display::section_summary(store, section)?;
    output::section(label);
    output::line(summary);
    Ok(())
}

fn cmd_get(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = parse_path(arg(args, 0, "get <path>")?)?;
    let store = context.store()?;
    match store.read(&path) {
        Some(value) => output::line(serde_json::to_string_pretty(value).map_err(crate::FormError::from)?),
        None => output::warning(format!("`{path}` is not present in the record.")),
    }
    Ok(())
}

/// Free text unless it looks like a JSON array or object.
fn parse_value(raw: &str) -> Result<Value, CommandError> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        serde_json::from_str(trimmed)
            .map_err(|err| CommandError::InvalidArguments(format!("invalid JSON value: {err}")))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "set <path> <value>";
    let path = parse_path(arg(args, 0, usage)?)?;
    let raw = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    let value = parse_value(&raw)?;
    let outcome = context.store_mut()?.write(&path, value)?;
    report_outcome(outcome, &path);
    Ok(())
}

fn cmd_tag(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "tag <path> add|remove <value>";
    let path = parse_path(arg(args, 0, usage)?)?;
    let action = arg(args, 1, usage)?;
    let value = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
    let edit = match action {
        "add" => FieldEdit::TagKey {
            pending: value,
            key: TagKey::Enter,
        },
        "remove" => FieldEdit::RemoveTag(value),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown tag action `{other}`; usage: {usage}"
            )))
        }
    };
    let outcome = context.store_mut()?.edit(&path, edit)?;
    report_outcome(outcome, &path);
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "toggle <path> <option> on|off";
    let path = parse_path(arg(args, 0, usage)?)?;
    let option = arg(args, 1, usage)?.to_string();
    let checked = match arg(args, 2, usage)? {
        "on" => true,
        "off" => false,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "expected on or off, got `{other}`"
            )))
        }
    };
    let outcome = context
        .store_mut()?
        .edit(&path, FieldEdit::Toggle { option, checked })?;
    report_outcome(outcome, &path);
    Ok(())
}

fn cmd_choose(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "choose <path> <yes|no|other> [details]";
    let path = parse_path(arg(args, 0, usage)?)?;
    let choice = arg(args, 1, usage)?.to_string();
    let details = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();

    let store = context.store_mut()?;
    let mut outcome = store.edit(&path, FieldEdit::Choose(choice))?;
    if outcome.applied() && !details.is_empty() {
        outcome = store.edit(&path, FieldEdit::Details(details))?;
    }
    report_outcome(outcome, &path);
    Ok(())
}

fn cmd_bulk(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "bulk <group> <yes|no|other|clear>";
    let group = arg(args, 0, usage)?;
    let choice: BulkChoice = arg(args, 1, usage)?.parse()?;
    let store = context.store_mut()?;
    store.apply_bulk(group, choice)?;
    output::success(format!(
        "Bulk group `{group}` set to {}.",
        store.bulk_state(group)?
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_text_unless_they_look_like_json() {
        assert_eq!(parse_value("2024-01-01").unwrap(), Value::String("2024-01-01".into()));
        assert_eq!(parse_value("[\"a\"]").unwrap(), serde_json::json!(["a"]));
        assert!(parse_value("{ broken").is_err());
    }
}
