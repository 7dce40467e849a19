//! Line-editing and scripted front ends over [`ShellContext`].

use std::borrow::Cow;
use std::io::{self, BufRead};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::catalog::{Catalog, FieldKind};
use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;
use crate::form::{composite::member_paths, FormStore};
use crate::record::ContractLine;

const SCRIPT_ENV: &str = "CONTRACT_FORMS_CLI_SCRIPT";

const CHOICES: &[&str] = &["yes", "no", "other"];
const BULK_CHOICES: &[&str] = &["yes", "no", "other", "clear"];
const TAG_ACTIONS: &[&str] = &["add", "remove"];
const TOGGLE_STATES: &[&str] = &["on", "off"];

/// Runs the shell, reading commands from stdin without prompts when
/// `CONTRACT_FORMS_CLI_SCRIPT` is set.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        colored::control::set_override(false);
    }

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            output::info("Contract Forms shell. Type `help` to list commands.");
            run_interactive(&mut context)
        }
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<FormHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(FormHelper::default()));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        if let Some(helper) = editor.helper_mut() {
            helper.refresh(context);
        }
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                if run_line(context, line)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if run_line(context, &line)? == LoopControl::Exit || !context.running {
            break;
        }
    }
    Ok(())
}

/// Executes one line. Command failures are reported and the loop keeps going.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match context.execute(line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

/// Completion and usage hints for the commands and the form that is open.
#[derive(Default)]
struct FormHelper {
    commands: Vec<(&'static str, &'static str)>,
    line: Option<ContractLine>,
    sections: Vec<&'static str>,
    paths: Vec<String>,
    groups: Vec<&'static str>,
}

impl FormHelper {
    fn refresh(&mut self, context: &ShellContext) {
        if self.commands.is_empty() {
            self.load_commands(context.registry.iter());
        }
        let store = context.store.as_ref();
        if store.map(FormStore::line) != self.line {
            self.load_form(store.map(FormStore::catalog));
        }
    }

    fn load_commands<'a>(&mut self, definitions: impl Iterator<Item = &'a CommandDefinition>) {
        self.commands = definitions
            .map(|definition| (definition.name, definition.usage))
            .collect();
    }

    fn load_form(&mut self, catalog: Option<&Catalog>) {
        self.line = catalog.map(Catalog::line);
        self.sections = catalog
            .map(|catalog| {
                catalog
                    .sections_in_order()
                    .into_iter()
                    .map(|section| section.id)
                    .collect()
            })
            .unwrap_or_default();
        self.paths = catalog.map(field_paths).unwrap_or_default();
        self.groups = catalog
            .map(|catalog| catalog.bulk_groups().iter().map(|group| group.id).collect())
            .unwrap_or_default();
    }

    /// Words that may fill argument `index` of `command`.
    fn operands(&self, command: &str, index: usize) -> Vec<&str> {
        match (command, index) {
            ("help", 0) => self.commands.iter().map(|(name, _)| *name).collect(),
            ("open", 0) => ContractLine::ALL.iter().map(|line| line.slug()).collect(),
            ("show" | "fields", 0) => self.sections.clone(),
            ("get" | "set" | "tag" | "toggle" | "choose", 0) => {
                self.paths.iter().map(String::as_str).collect()
            }
            ("tag", 1) => TAG_ACTIONS.to_vec(),
            ("toggle", 2) => TOGGLE_STATES.to_vec(),
            ("choose", 1) => CHOICES.to_vec(),
            ("bulk", 0) => self.groups.clone(),
            ("bulk", 1) => BULK_CHOICES.to_vec(),
            _ => Vec::new(),
        }
    }

    /// Offset of the word being typed at the end of `prefix`, and its completions.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(idx, c)| idx + c.len_utf8());
        let needle = &prefix[start..];
        let mut typed = prefix[..start].split_whitespace();
        let pool = match typed.next() {
            None => self.commands.iter().map(|(name, _)| *name).collect(),
            Some(command) => self.operands(&command.to_lowercase(), typed.count()),
        };
        let matches = pool
            .into_iter()
            .filter(|word| word.starts_with(needle))
            .map(str::to_string)
            .collect();
        (start, matches)
    }

    /// The usage words still to be typed after a complete command and arguments.
    fn usage_hint(&self, line: &str) -> Option<String> {
        if !line.ends_with(char::is_whitespace) {
            return None;
        }
        let mut words = line.split_whitespace();
        let command = words.next()?.to_lowercase();
        let (_, usage) = self.commands.iter().find(|(name, _)| *name == command)?;
        let rest: Vec<&str> = usage.split_whitespace().skip(1 + words.count()).collect();
        (!rest.is_empty()).then(|| rest.join(" "))
    }
}

/// Every path the catalog lets a user write, composite members included.
fn field_paths(catalog: &Catalog) -> Vec<String> {
    let mut paths = Vec::new();
    for section in catalog.sections_in_order() {
        let Ok(fields) = catalog.fields_for(section.id) else {
            continue;
        };
        for field in fields {
            match field.kind {
                FieldKind::Composite(kind) => paths.extend(
                    member_paths(kind, &field.path)
                        .unwrap_or_default()
                        .iter()
                        .map(ToString::to_string),
                ),
                _ => {
                    paths.push(field.path.to_string());
                    paths.extend(field.sub_fields().iter().map(|member| member.path.to_string()));
                }
            }
        }
    }
    paths.sort();
    paths.dedup();
    paths
}

impl Helper for FormHelper {}

impl Completer for FormHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for FormHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for FormHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for FormHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::library::RIGHTS_GROUP;
    use crate::cli::commands::all_definitions;

    fn helper(line: Option<ContractLine>) -> FormHelper {
        let definitions = all_definitions();
        let catalog = line.map(|line| Catalog::load(line).unwrap());
        let mut helper = FormHelper::default();
        helper.load_commands(definitions.iter());
        helper.load_form(catalog.as_ref());
        helper
    }

    #[test]
    fn first_word_completes_command_names() {
        let helper = helper(None);
        let (start, words) = helper.candidates("se");
        assert_eq!(start, 0);
        assert!(words.contains(&"set".to_string()));
        assert!(words.contains(&"sections".to_string()));
        assert!(!words.contains(&"show".to_string()));
    }

    #[test]
    fn arguments_complete_from_the_open_form() {
        let helper = helper(Some(ContractLine::Academic));

        let (start, words) = helper.candidates("show reg");
        assert_eq!(start, 5);
        assert!(words.contains(&"registration-info".to_string()));

        let (_, words) = helper.candidates("toggle scopeInfo.thirdParty");
        assert!(words.contains(&"scopeInfo.thirdPartyPlatform_consent".to_string()));

        let (_, words) = helper.candidates("tag basicInfo.contractParty ");
        assert_eq!(words, vec!["add", "remove"]);
    }

    #[test]
    fn bulk_groups_complete_on_library_forms() {
        let helper = helper(Some(ContractLine::LibraryServices));
        let (_, words) = helper.candidates("bulk ");
        assert!(words.contains(&RIGHTS_GROUP.to_string()));
        let (_, words) = helper.candidates(&format!("bulk {RIGHTS_GROUP} o"));
        assert_eq!(words, vec!["other"]);
    }

    #[test]
    fn paths_need_an_open_form() {
        let helper = helper(None);
        assert!(helper.candidates("get con").1.is_empty());
        assert_eq!(helper.candidates("open ac").1, vec!["academic"]);
    }

    #[test]
    fn hints_show_the_remaining_usage() {
        let helper = helper(None);
        assert_eq!(helper.usage_hint("set "), Some("<path> <value>".to_string()));
        assert_eq!(helper.usage_hint("set remarks "), Some("<value>".to_string()));
        assert_eq!(helper.usage_hint("set"), None);
        assert_eq!(helper.usage_hint("sections "), None);
        assert_eq!(helper.usage_hint("nope "), None);
    }
}
