//! Command-line interface for rollcall.
//!
//! This module provides the CLI structure for the `rollcall` binary and the
//! confirmation prompt used by destructive commands.

mod commands;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClearCommand, ConfigCommand, MarkCommand, OrderArg, ReportCommand, StatusArg, StudentCommand,
    TodayCommand,
};

use crate::logging::Verbosity;

/// rollcall - Classroom attendance tracking
///
/// Keep a roster of students, mark them present or absent each day, and
/// report attendance rates from the accumulated history.
#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the student roster
    #[command(subcommand)]
    Student(StudentCommand),

    /// Mark a student present or absent for today
    Mark(MarkCommand),

    /// Show today's attendance
    Today(TodayCommand),

    /// Clear all of today's attendance
    Clear(ClearCommand),

    /// Show attendance statistics
    Report(ReportCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Ask a yes/no question, defaulting to no.
///
/// Only `y` or `yes` (any case) confirms; end of input declines.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "rollcall");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_from_flags() {
        let cli = Cli::try_parse_from(["rollcall", "-q", "today"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["rollcall", "-vv", "today"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_student_add() {
        let cli =
            Cli::try_parse_from(["rollcall", "student", "add", "Alice", "-e", "a@school.org"])
                .unwrap();
        match cli.command {
            Command::Student(StudentCommand::Add { name, email }) => {
                assert_eq!(name, "Alice");
                assert_eq!(email.as_deref(), Some("a@school.org"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_mark() {
        let cli = Cli::try_parse_from(["rollcall", "mark", "1704067200000", "absent"]).unwrap();
        match cli.command {
            Command::Mark(cmd) => {
                assert_eq!(cmd.student_id, "1704067200000");
                assert_eq!(cmd.status, StatusArg::Absent);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_mark_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["rollcall", "mark", "1", "late"]).is_err());
    }

    #[test]
    fn test_parse_clear_with_yes() {
        let cli = Cli::try_parse_from(["rollcall", "clear", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Clear(ClearCommand { yes: true })));
    }

    #[test]
    fn test_parse_report_overrides() {
        let cli =
            Cli::try_parse_from(["rollcall", "report", "--limit", "3", "--order", "roster"])
                .unwrap();
        match cli.command {
            Command::Report(cmd) => {
                assert_eq!(cmd.limit, Some(3));
                assert_eq!(cmd.order, Some(OrderArg::Roster));
                assert!(!cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["rollcall", "-c", "/custom/config.toml", "today"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_confirm_answers() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
            ("maybe\n", false),
        ] {
            let mut input = answer.as_bytes();
            let mut output = Vec::new();
            assert_eq!(
                confirm("Clear?", &mut input, &mut output).unwrap(),
                expected,
                "answer {answer:?}"
            );
            assert_eq!(String::from_utf8(output).unwrap(), "Clear? [y/N] ");
        }
    }
}
