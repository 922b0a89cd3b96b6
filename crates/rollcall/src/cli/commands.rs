//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::StatsOrder;
use crate::model::AttendanceStatus;

/// Roster commands.
#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// Add a student to the roster
    Add {
        /// Student name
        name: String,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },

    /// List students on the roster
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove a student from the roster (history is kept)
    Delete {
        /// Student id
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Mark command arguments.
#[derive(Debug, Args)]
pub struct MarkCommand {
    /// Student id
    pub student_id: String,

    /// Attendance status
    #[arg(value_enum)]
    pub status: StatusArg,
}

/// Today command arguments.
#[derive(Debug, Args)]
pub struct TodayCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Number of recent dates to summarize (overrides configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Ordering of per-student statistics (overrides configuration)
    #[arg(short, long, value_enum)]
    pub order: Option<OrderArg>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Attendance status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Student is present
    Present,
    /// Student is absent
    Absent,
}

impl From<StatusArg> for AttendanceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Present => Self::Present,
            StatusArg::Absent => Self::Absent,
        }
    }
}

/// Report ordering argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Highest attendance rate first
    Rate,
    /// Roster order
    Roster,
}

impl From<OrderArg> for StatsOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Rate => Self::Rate,
            OrderArg::Roster => Self::Roster,
        }
    }
}
