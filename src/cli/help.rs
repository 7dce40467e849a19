use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::output;

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for entry in registry.iter() {
        output::line(format!("  {:<16} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandDefinition) {
    output::section(format!("Help: {}", entry.name));
    output::line(format!("  Description: {}", entry.description));
    output::line(format!("  Usage: {}", entry.usage));
}
