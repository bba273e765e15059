//! Help text for shell commands, generated from the command definitions.

use super::definitions::{commands_in_category, CommandCategory, CommandDef};

/// Help listing every command, grouped by category.
pub fn general_help() -> String {
    let mut text = String::from("Available commands:\n");

    for category in CommandCategory::ALL {
        text.push('\n');
        text.push_str(category.display_name());
        text.push_str(":\n");
        for cmd in commands_in_category(category) {
            text.push_str(&format!("  {:<20} - {}\n", cmd.name, cmd.description));
        }
    }

    text.push_str(
        "\nArguments are key=value, --key=value or --flag. Keys may be written as\n\
         includeTables, include_tables or include-tables.\n\
         Type `help <command>` for usage.",
    );
    text
}

/// Help for a single command.
pub fn command_help(cmd: &CommandDef) -> String {
    let mut text = format!("{} - {}\n\nUsage: {}", cmd.name, cmd.description, cmd.usage);
    if !cmd.aliases.is_empty() {
        text.push_str(&format!("\nAliases: {}", cmd.aliases.join(", ")));
    }
    text.push_str(&format!("\nRequires: {} session", cmd.requires.label()));
    text
}
