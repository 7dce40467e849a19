use crate::access;
use crate::cli::commands::{arg, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{help, output};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new(
            "login",
            "Log in with an employee id",
            "login <employee-id>",
            cmd_login,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let employee_id = arg(args, 0, "login <employee-id>")?;
    let user = access::authenticate(employee_id).ok_or_else(|| {
        CommandError::Message(format!("User not found (demo account: 12345): {employee_id}"))
    })?;
    context.user = Some(user);
    context.store = None;

    let lines = access::reachable_lines(user);
    output::success(format!("Logged in as {} ({}).", user.name, user.department.label()));
    if lines.is_empty() {
        output::warning("This account cannot create or maintain contracts.");
    } else {
        let slugs: Vec<_> = lines.iter().map(|line| line.slug()).collect();
        output::info(format!("Contract lines available: {}", slugs.join(", ")));
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Contract Forms {}", meta.version));
    output::line(format!("  Build hash   : {} ({})", meta.git_hash, meta.tree_state));
    output::line(format!("  Built at     : {}", meta.built_at));
    output::line(format!("  Profile      : {}", meta.profile));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
