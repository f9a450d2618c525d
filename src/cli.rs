//! This module contains the command-line interface [`Cli`] parser for registering students and
//! recording their attendance, and the line parser for the interactive [`Command::Shell`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::app::Event;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(name = "qr-attendance", version, about = "QR code based student attendance")]
pub struct Cli {
    /// The different commands available for managing students and attendance.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new student and generate their QR code.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Delete a student, their attendance, and their QR code.
    Delete { id: String },

    /// Mark attendance from an image containing a student's QR code.
    #[command(alias = "drop")]
    Scan { path: String },

    /// Mark a student as present today by ID.
    Mark { id: String },

    /// Show all attendance records.
    View {
        /// Render the records as a table.
        #[arg(long)]
        table: bool,
    },

    /// Show every registered student.
    Roster,

    /// Export all attendance records to a CSV file.
    Export { path: PathBuf },

    /// Fill in the registration form interactively.
    Shell,
}

/// One line of input to the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Event(Event),
    ShowForm,
    Help,
    Quit,
}

pub const SHELL_HELP: &str = "\
name <text>        set the student name
email <text>       set the student email
delete-id <text>   set the ID to delete
register           register the student in the form
delete             delete the student with the entered ID
drop <path>        mark attendance from a QR code image
view               show all attendance records
form               show the form contents
help               show this help
quit               leave the shell";

/// Parses one shell line. Blank lines parse to `Ok(None)`.
pub fn parse_shell_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "name" => ShellCommand::Event(Event::EditName(rest.to_string())),
        "email" => ShellCommand::Event(Event::EditEmail(rest.to_string())),
        "delete-id" => ShellCommand::Event(Event::EditDeleteId(rest.to_string())),
        "register" => ShellCommand::Event(Event::Register),
        "delete" => ShellCommand::Event(Event::Delete),
        "view" => ShellCommand::Event(Event::View),
        "drop" if rest.is_empty() => return Err("drop needs a file path".to_string()),
        "drop" => ShellCommand::Event(Event::Drop(rest.to_string())),
        "form" => ShellCommand::ShowForm,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn drop_is_an_alias_for_scan() {
        let cli = Cli::try_parse_from(["qr-attendance", "drop", "{/tmp/a b.png}"]).unwrap();
        assert!(matches!(cli.command, Command::Scan { path } if path == "{/tmp/a b.png}"));
    }

    #[test]
    fn parses_field_edits_with_spaces() {
        assert_eq!(
            parse_shell_line("name  Ada Lovelace ").unwrap(),
            Some(ShellCommand::Event(Event::EditName("Ada Lovelace".into())))
        );
        assert_eq!(
            parse_shell_line("drop {/tmp/my code.png}").unwrap(),
            Some(ShellCommand::Event(Event::Drop("{/tmp/my code.png}".into())))
        );
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!(parse_shell_line("   ").unwrap(), None);
        assert_eq!(
            parse_shell_line("register").unwrap(),
            Some(ShellCommand::Event(Event::Register))
        );
        assert_eq!(parse_shell_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(
            parse_shell_line("email").unwrap(),
            Some(ShellCommand::Event(Event::EditEmail(String::new())))
        );
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(parse_shell_line("dance").is_err());
        assert!(parse_shell_line("drop").is_err());
    }
}
