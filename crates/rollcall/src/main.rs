//! `rollcall` - CLI for classroom attendance tracking

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::{bail, Context};
use clap::Parser;

use rollcall::cli::{
    confirm, Cli, ClearCommand, Command, ConfigCommand, MarkCommand, ReportCommand,
    StudentCommand, TodayCommand,
};
use rollcall::{
    init_logging, AttendanceTracker, Config, Error, History, Report, Roster, SqliteStore,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    if let Command::Config(config_cmd) = cli.command {
        return handle_config(&config, config_cmd);
    }

    let path = config.database_path();
    let mut store = SqliteStore::open(&path)
        .with_context(|| format!("opening attendance data at {}", path.display()))?;

    match cli.command {
        Command::Student(cmd) => handle_student(&mut store, cmd),
        Command::Mark(cmd) => handle_mark(&mut store, &cmd),
        Command::Today(cmd) => handle_today(&store, &cmd),
        Command::Clear(cmd) => handle_clear(&mut store, &cmd),
        Command::Report(cmd) => handle_report(&store, &config, &cmd),
        Command::Config(_) => Ok(()),
    }
}

fn ask(prompt: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    confirm(prompt, &mut input, &mut output).context("reading confirmation")
}

fn handle_student(store: &mut SqliteStore, cmd: StudentCommand) -> anyhow::Result<()> {
    match cmd {
        StudentCommand::Add { name, email } => {
            let mut roster = Roster::load_for_update(&*store).context("reading roster")?;
            let student = roster
                .add_student(store, &name, email.as_deref())
                .context("adding student")?;
            println!("Added {} (id {})", student.name, student.id);
        }
        StudentCommand::List { json } => {
            let roster = Roster::load(&*store);
            if json {
                println!("{}", serde_json::to_string_pretty(roster.students())?);
            } else if roster.is_empty() {
                println!("No students yet. Add one with `rollcall student add <NAME>`.");
            } else {
                for student in roster.students() {
                    let email = student.email.as_deref().unwrap_or("-");
                    println!(
                        "{:<15} {:<24} {:<28} added {}",
                        student.id,
                        student.name,
                        email,
                        student.created_at.format("%Y-%m-%d")
                    );
                }
            }
        }
        StudentCommand::Delete { id, yes } => {
            let mut roster = Roster::load_for_update(&*store).context("reading roster")?;
            let Some(student) = roster.find(&id).cloned() else {
                println!("No student with id {id}.");
                return Ok(());
            };
            if !yes
                && !ask(&format!(
                    "Delete {} from the roster? Their attendance history is kept.",
                    student.name
                ))?
            {
                println!("Cancelled.");
                return Ok(());
            }
            roster.delete_student(store, &id).context("deleting student")?;
            println!("Deleted {}.", student.name);
        }
    }
    Ok(())
}

fn handle_mark(store: &mut SqliteStore, cmd: &MarkCommand) -> anyhow::Result<()> {
    let roster = Roster::load(&*store);
    let Some(student) = roster.find(&cmd.student_id) else {
        return Err(Error::unknown_student(&cmd.student_id).into());
    };

    let status = cmd.status.into();
    let mut tracker = AttendanceTracker::load_today(&*store);
    tracker
        .mark(store, &student.id, status)
        .context("saving attendance")?;

    let summary = tracker.summary(&roster);
    println!(
        "{} marked {} for {} ({} present, {} absent, {} unmarked)",
        student.name, status, summary.date, summary.present, summary.absent, summary.unmarked
    );
    Ok(())
}

fn handle_today(store: &SqliteStore, cmd: &TodayCommand) -> anyhow::Result<()> {
    let roster = Roster::load(store);
    let tracker = AttendanceTracker::load_today(store);
    let summary = tracker.summary(&roster);

    if cmd.json {
        let out = serde_json::json!({
            "date": tracker.date(),
            "attendance": tracker.marks(),
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Attendance for {}", tracker.date().format("%A, %B %-d, %Y"));
    println!("-----------------------------------");
    for student in roster.students() {
        let mark = tracker
            .status_of(&student.id)
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("  {:<24} {}", student.name, mark);
    }
    println!();
    println!(
        "Present: {}   Absent: {}   Unmarked: {}",
        summary.present, summary.absent, summary.unmarked
    );
    Ok(())
}

fn handle_clear(store: &mut SqliteStore, cmd: &ClearCommand) -> anyhow::Result<()> {
    let mut tracker = AttendanceTracker::load_today(&*store);
    if !cmd.yes && !ask(&format!("Clear all attendance for {}?", tracker.date()))? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = tracker.clear_today(store).context("clearing attendance")?;
    println!(
        "Cleared attendance for {} ({} record(s) removed).",
        tracker.date(),
        removed
    );
    Ok(())
}

fn handle_report(store: &SqliteStore, config: &Config, cmd: &ReportCommand) -> anyhow::Result<()> {
    let mut reports = config.reports.clone();
    if let Some(limit) = cmd.limit {
        if limit == 0 {
            bail!("--limit must be greater than 0");
        }
        reports.recent_dates_limit = limit;
    }
    if let Some(order) = cmd.order {
        reports.order = order.into();
    }

    let roster = Roster::load(store);
    let history = History::load(store);
    let report = Report::build(&roster, &history, &reports);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Overall");
    println!("-------");
    println!("  Records:  {}", report.overall.total_records);
    println!("  Present:  {}", report.overall.present_records);
    println!("  Absent:   {}", report.overall.absent_records);
    println!("  Rate:     {:.1}%", report.overall.overall_rate);

    if !report.recent.is_empty() {
        println!();
        println!("Recent days");
        println!("-----------");
        for day in &report.recent {
            println!(
                "  {}  {}/{} present",
                day.date.format("%a, %b %-d"),
                day.present_count,
                day.total_count
            );
        }
    }

    println!();
    println!("Students");
    println!("--------");
    if report.students.is_empty() {
        println!("  No students yet.");
    }
    for stats in &report.students {
        println!(
            "  {:<24} {:>5.1}%  ({} present, {} absent)",
            stats.student.name, stats.attendance_rate, stats.present_days, stats.absent_days
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Reports]");
                println!("  Recent dates:       {}", config.reports.recent_dates_limit);
                println!("  Order:              {:?}", config.reports.order);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
