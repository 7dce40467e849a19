//! Shell context, dispatch, and error reporting.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    access::{self, User},
    config::{Config, ConfigManager},
    errors::FormError,
    form::{FormStore, InMemoryHistory, NotificationKind},
    record::ContractLine,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("{0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No form open. Use `open <line>` first.")]
    NoFormOpen,
    #[error("Not logged in. Use `login <employee-id>` first.")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub history: InMemoryHistory,
    pub store: Option<FormStore>,
    pub user: Option<&'static User>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let registry = CommandRegistry::new(commands::all_definitions());
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let history = InMemoryHistory::with_samples()?;

        let mut context = ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            history,
            store: None,
            user: None,
            last_command: None,
            running: true,
        };
        context.auto_login();
        Ok(context)
    }

    fn auto_login(&mut self) {
        let Some(operator) = self.config.operator_id.clone() else {
            return;
        };
        match access::authenticate(&operator) {
            Some(user) => {
                self.user = Some(user);
                output::info(format!("Logged in as {} from saved operator id.", user.name));
            }
            None => tracing::warn!(operator = %operator, "saved operator id is unknown"),
        }
    }

    pub(crate) fn prompt(&self) -> String {
        let form = self
            .store
            .as_ref()
            .map(|store| store.line().slug().to_string())
            .unwrap_or_else(|| "no-form".to_string());
        match self.user {
            Some(user) => format!("{form} ({}) > ", user.employee_id),
            None => format!("{form} > "),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn user(&self) -> Result<&'static User, CommandError> {
        self.user.ok_or(CommandError::NotLoggedIn)
    }

    pub(crate) fn store(&self) -> Result<&FormStore, CommandError> {
        self.store.as_ref().ok_or(CommandError::NoFormOpen)
    }

    pub(crate) fn store_mut(&mut self) -> Result<&mut FormStore, CommandError> {
        self.store.as_mut().ok_or(CommandError::NoFormOpen)
    }

    /// Opens a blank form for `line` after checking the user may reach it.
    pub(crate) fn open_form(&mut self, line: ContractLine) -> CommandResult {
        let user = self.user()?;
        if !access::can_open(user, line) {
            return Err(CommandError::Message(format!(
                "{} may not open {} contracts.",
                user.name, line
            )));
        }
        let store = FormStore::new(line)?.with_notification_ttl(self.config.notification_ttl());
        self.store = Some(store);
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Prints and dismisses the form's pending notification, if any.
    pub(crate) fn flush_notification(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        store.tick_now();
        if let Some(notification) = store.notification() {
            match notification.kind {
                NotificationKind::Success => output::success(&notification.text),
                NotificationKind::Error => output::error(&notification.text),
            }
        }
        store.dismiss_notification();
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let result = handler(self, args);
        self.flush_notification();
        match result {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Tokenizes and runs one input line. Blank lines and `#` comments are skipped.
    pub(crate) fn execute(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(LoopControl::Continue);
        }
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(format!("Could not parse `{line}`: {err}"));
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.to_string());

        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, input), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(false)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NotLoggedIn => {
                output::error(err.to_string());
                output::hint("Try `login 12345` to use the demo administrator.");
            }
            other => output::error(other.to_string()),
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::new(CliMode::Script)?;
    for line in lines {
        match context.execute(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldPath;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_home<T>(f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = tempdir().unwrap();
        std::env::set_var("CONTRACT_FORMS_HOME", dir.path());
        let result = f();
        std::env::remove_var("CONTRACT_FORMS_HOME");
        result
    }

    #[test]
    fn open_requires_login() {
        with_home(|| {
            let context = process_script(&["open academic"]).unwrap();
            assert!(context.store.is_none());
        });
    }

    #[test]
    fn library_user_cannot_open_academic_forms() {
        with_home(|| {
            let context = process_script(&["login 23456", "open academic"]).unwrap();
            assert!(context.store.is_none());

            let context = process_script(&["login 23456", "open library"]).unwrap();
            assert_eq!(
                context.store.as_ref().map(|store| store.line()),
                Some(ContractLine::LibraryServices)
            );
        });
    }

    #[test]
    fn set_writes_through_the_store() {
        with_home(|| {
            let context = process_script(&[
                "login 12345",
                "open academic",
                "set contractTarget.title 'Journal of Tests'",
                "tag basicInfo.contractParty add 華藝",
                "tag basicInfo.contractParty add 華藝",
            ])
            .unwrap();
            let store = context.store.unwrap();
            let title = FieldPath::parse("contractTarget.title").unwrap();
            assert_eq!(store.record().text(&title), "Journal of Tests");
            let party = FieldPath::parse("basicInfo.contractParty").unwrap();
            assert_eq!(store.read(&party), Some(&serde_json::json!(["華藝"])));
        });
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        with_home(|| {
            let context = process_script(&["# demo administrator", "", "login 12345"]).unwrap();
            assert_eq!(context.user.map(|user| user.employee_id), Some("12345"));
            assert_eq!(context.last_command.as_deref(), Some("login 12345"));
        });
    }

    #[test]
    fn exit_stops_the_shell() {
        with_home(|| {
            let context = process_script(&["exit", "login 12345"]).unwrap();
            assert!(!context.running);
            assert!(context.user.is_none());
        });
    }

    #[test]
    fn unknown_commands_keep_the_shell_running() {
        with_home(|| {
            let context = process_script(&["opne academic"]).unwrap();
            assert!(context.running);
        });
    }
}
