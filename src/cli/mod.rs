use crate::domain::{Tracker, format_rfc3339, local_now, ordered_day_labels};
use crate::infra::{
    LoadCommitsError, LoadHistoryError, LoadPlanError, PersistSessionCommitError, load_commits,
    load_history, load_plan, persist_session_commit,
};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

const DEFAULT_ACTIVITY_DAYS: u16 = 90;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Tui,
    Command(CliCommand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Plan {
        day: Option<String>,
    },
    History {
        day: Option<String>,
    },
    Sets {
        exercise: String,
    },
    Log {
        day: String,
        exercise: String,
        weight: String,
        reps: u32,
        notes: Option<String>,
        commit: bool,
    },
    Activity {
        days: u16,
    },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1);
    let Some(subcommand) = iter.next() else {
        return Ok(CliInvocation::Tui);
    };

    match subcommand.as_str() {
        "plan" => {
            let day = single_optional_positional(iter)?;
            Ok(CliInvocation::Command(CliCommand::Plan { day }))
        }
        "history" => {
            let day = single_optional_positional(iter)?;
            Ok(CliInvocation::Command(CliCommand::History { day }))
        }
        "sets" => {
            let exercise = single_optional_positional(iter)?
                .ok_or_else(|| CliParseError::MissingArgument("exercise".to_string()))?;
            Ok(CliInvocation::Command(CliCommand::Sets { exercise }))
        }
        "log" => {
            let mut positionals: Vec<String> = Vec::new();
            let mut notes: Option<String> = None;
            let mut commit = false;

            let mut args = iter;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--notes" | "-n" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--notes".to_string())
                        })?;
                        notes = Some(value.clone());
                    }
                    "--commit" | "-c" => {
                        commit = true;
                    }
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag(arg.to_string()));
                    }
                    _ => positionals.push(arg.clone()),
                }
            }

            if positionals.len() > 4 {
                return Err(CliParseError::UnexpectedArgument(positionals[4].clone()));
            }
            let mut positionals = positionals.into_iter();
            let day = positionals
                .next()
                .ok_or_else(|| CliParseError::MissingArgument("day".to_string()))?;
            let exercise = positionals
                .next()
                .ok_or_else(|| CliParseError::MissingArgument("exercise".to_string()))?;
            let weight = positionals
                .next()
                .ok_or_else(|| CliParseError::MissingArgument("weight".to_string()))?;
            let reps_raw = positionals
                .next()
                .ok_or_else(|| CliParseError::MissingArgument("reps".to_string()))?;
            let reps = reps_raw
                .parse::<u32>()
                .map_err(|_| CliParseError::InvalidFlagValue {
                    flag: "reps".to_string(),
                    value: reps_raw,
                })?;

            Ok(CliInvocation::Command(CliCommand::Log {
                day,
                exercise,
                weight,
                reps,
                notes,
                commit,
            }))
        }
        "activity" => {
            let mut days = DEFAULT_ACTIVITY_DAYS;

            let mut args = iter;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--days" | "-d" => {
                        let value = args.next().ok_or_else(|| {
                            CliParseError::MissingFlagValue("--days".to_string())
                        })?;
                        days = value.parse::<u16>().map_err(|_| {
                            CliParseError::InvalidFlagValue {
                                flag: "--days".to_string(),
                                value: value.clone(),
                            }
                        })?;
                    }
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag(arg.to_string()));
                    }
                    _ => {
                        return Err(CliParseError::UnexpectedArgument(arg.to_string()));
                    }
                }
            }

            Ok(CliInvocation::Command(CliCommand::Activity { days }))
        }
        other => Err(CliParseError::UnknownSubcommand(other.to_string())),
    }
}

fn single_optional_positional<'a>(
    iter: impl Iterator<Item = &'a String>,
) -> Result<Option<String>, CliParseError> {
    let mut value: Option<String> = None;
    for arg in iter {
        if arg.starts_with('-') {
            return Err(CliParseError::UnknownFlag(arg.clone()));
        }
        if value.is_some() {
            return Err(CliParseError::UnexpectedArgument(arg.clone()));
        }
        value = Some(arg.clone());
    }
    Ok(value)
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    LoadPlan(#[from] LoadPlanError),

    #[error(transparent)]
    LoadHistory(#[from] LoadHistoryError),

    #[error(transparent)]
    LoadCommits(#[from] LoadCommitsError),

    #[error(transparent)]
    PersistCommit(#[from] PersistSessionCommitError),

    #[error("unknown day: {0}\nHint: run `gaingrid plan` and copy the day label.")]
    UnknownDay(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn run(command: CliCommand, data_dir: &Path) -> Result<(), CliRunError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut err = io::BufWriter::new(stderr.lock());

    let plan = load_plan(data_dir)?;
    let history = load_history(data_dir)?;
    let loaded = load_commits(data_dir)?;
    if loaded.skipped > 0 {
        write_line(
            &mut err,
            &format!("warning: skipped {} unreadable commit records", loaded.skipped),
        )?;
    }
    let mut tracker = Tracker::new(plan, history, loaded.commits);

    match command {
        CliCommand::Plan { day } => {
            let labels = match day {
                Some(day) => {
                    if tracker.day_plan(&day).is_none() {
                        return Err(CliRunError::UnknownDay(day));
                    }
                    vec![day]
                }
                None => ordered_day_labels(tracker.plan()),
            };

            for label in labels {
                let Some(plan) = tracker.day_plan(&label) else {
                    continue;
                };
                if !plan.warm_up.is_empty() {
                    let line = format!("{label}\twarm-up\t{}", plan.warm_up);
                    if !write_line(&mut out, &line)? {
                        return Ok(());
                    }
                }
                for workout in &plan.workouts {
                    let line = format!("{label}\tworkout\t{workout}");
                    if !write_line(&mut out, &line)? {
                        return Ok(());
                    }
                }
                if !plan.cardio.is_empty() {
                    let line = format!("{label}\tcardio\t{}", plan.cardio);
                    if !write_line(&mut out, &line)? {
                        return Ok(());
                    }
                }
            }
            Ok(())
        }
        CliCommand::History { day } => {
            let mut rows: Vec<(time::OffsetDateTime, String, usize)> = Vec::new();
            for (label, entries) in tracker.history_by_day() {
                if day.as_ref().is_some_and(|day| day != label) {
                    continue;
                }
                for entry in entries {
                    rows.push((entry.date, label.clone(), entry.sets.len()));
                }
            }
            rows.sort_by(|a, b| b.0.cmp(&a.0));

            for (date, label, set_count) in rows {
                let line = format!("{}\t{label}\t{set_count}", format_rfc3339(date));
                if !write_line(&mut out, &line)? {
                    return Ok(());
                }
            }
            Ok(())
        }
        CliCommand::Sets { exercise } => {
            for day in tracker.exercise_history(&exercise) {
                for set in &day.sets {
                    let notes = set.notes.as_deref().unwrap_or("");
                    let line =
                        format!("{}\t{}\t{}\t{notes}", day.date, set.weight, set.reps);
                    if !write_line(&mut out, &line)? {
                        return Ok(());
                    }
                }
            }
            Ok(())
        }
        CliCommand::Log {
            day,
            exercise,
            weight,
            reps,
            notes,
            commit,
        } => {
            if tracker.day_plan(&day).is_none() {
                return Err(CliRunError::UnknownDay(day));
            }

            let now = local_now();
            tracker.select_day(&day);
            tracker.add_set(&exercise, &weight, reps, notes, now);

            if !commit {
                let line = format!("{day}\t{exercise}\t{weight}\t{reps}");
                if !write_line(&mut out, &line)? {
                    return Ok(());
                }
                write_line(&mut err, "not committed (pass --commit to save)")?;
                return Ok(());
            }

            // A single logged set is never empty, so the payload exists.
            let Some(payload) = tracker.prepare_commit(&day, now) else {
                return Ok(());
            };
            let mut days = tracker.history_by_day().clone();
            days.entry(payload.day.clone())
                .or_default()
                .push(payload.history.clone());
            persist_session_commit(data_dir, &days, &payload.commit)?;
            let message = payload.commit.message.clone();
            let file_name = payload.commit.file_name.clone();
            tracker.apply_commit(payload);

            let line = format!("committed\t{message}\t{file_name}");
            if !write_line(&mut out, &line)? {
                return Ok(());
            }
            Ok(())
        }
        CliCommand::Activity { days } => {
            let counts = tracker.commits_by_date();
            let today = local_now().date();
            for (date, count) in crate::domain::activity_window(&counts, today, days) {
                if count == 0 {
                    continue;
                }
                let line = format!("{date}\t{count}");
                if !write_line(&mut out, &line)? {
                    return Ok(());
                }
            }
            Ok(())
        }
    }
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::load_history;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn parse_defaults_to_tui_when_no_args() {
        let parsed = parse_invocation(&args(&["gaingrid"])).expect("parse");
        assert_eq!(parsed, CliInvocation::Tui);
    }

    #[test]
    fn parse_help_flag_wins() {
        let parsed = parse_invocation(&args(&["gaingrid", "plan", "--help"])).expect("parse");
        assert_eq!(parsed, CliInvocation::PrintHelp);
    }

    #[test]
    fn parse_plan_with_optional_day() {
        let parsed = parse_invocation(&args(&["gaingrid", "plan"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::Plan { day: None })
        );

        let parsed =
            parse_invocation(&args(&["gaingrid", "plan", "Monday (Chest)"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::Plan {
                day: Some("Monday (Chest)".to_string())
            })
        );
    }

    #[test]
    fn parse_sets_requires_an_exercise() {
        let error = parse_invocation(&args(&["gaingrid", "sets"])).expect_err("error");
        assert!(matches!(error, CliParseError::MissingArgument(_)));
    }

    #[test]
    fn parse_log_with_flags() {
        let parsed = parse_invocation(&args(&[
            "gaingrid",
            "log",
            "Monday (Chest)",
            "Bench Press",
            "135 lbs",
            "8",
            "--notes",
            "paused reps",
            "--commit",
        ]))
        .expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::Log {
                day: "Monday (Chest)".to_string(),
                exercise: "Bench Press".to_string(),
                weight: "135 lbs".to_string(),
                reps: 8,
                notes: Some("paused reps".to_string()),
                commit: true,
            })
        );
    }

    #[test]
    fn parse_log_rejects_non_numeric_reps() {
        let error = parse_invocation(&args(&[
            "gaingrid",
            "log",
            "Monday (Chest)",
            "Bench Press",
            "135 lbs",
            "eight",
        ]))
        .expect_err("error");
        assert!(matches!(error, CliParseError::InvalidFlagValue { .. }));
    }

    #[test]
    fn parse_activity_days_flag() {
        let parsed =
            parse_invocation(&args(&["gaingrid", "activity", "--days", "30"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::Activity { days: 30 })
        );
    }

    #[test]
    fn parse_rejects_unknown_subcommand_and_flags() {
        assert!(matches!(
            parse_invocation(&args(&["gaingrid", "export"])),
            Err(CliParseError::UnknownSubcommand(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["gaingrid", "activity", "--format", "json"])),
            Err(CliParseError::UnknownFlag(_))
        ));
    }

    #[test]
    fn log_with_commit_persists_history_and_a_commit_record() {
        let dir = tempdir().expect("tempdir");

        run(
            CliCommand::Log {
                day: "Monday (Chest)".to_string(),
                exercise: "Bench Press".to_string(),
                weight: "135 lbs".to_string(),
                reps: 8,
                notes: None,
                commit: true,
            },
            dir.path(),
        )
        .expect("run");

        let history = load_history(dir.path()).expect("history");
        assert_eq!(history["Monday (Chest)"].len(), 1);
        let commits = crate::infra::load_commits(dir.path()).expect("commits");
        assert_eq!(commits.commits.len(), 1);
        assert_eq!(
            commits.commits[0].message,
            "Completed Monday (Chest) workout"
        );
    }

    #[test]
    fn log_without_commit_leaves_no_trace_on_disk() {
        let dir = tempdir().expect("tempdir");

        run(
            CliCommand::Log {
                day: "Monday (Chest)".to_string(),
                exercise: "Bench Press".to_string(),
                weight: "135 lbs".to_string(),
                reps: 8,
                notes: None,
                commit: false,
            },
            dir.path(),
        )
        .expect("run");

        let history = load_history(dir.path()).expect("history");
        assert!(history.is_empty());
    }

    #[test]
    fn log_rejects_unknown_days() {
        let dir = tempdir().expect("tempdir");

        let error = run(
            CliCommand::Log {
                day: "Moonday".to_string(),
                exercise: "Bench Press".to_string(),
                weight: "135 lbs".to_string(),
                reps: 8,
                notes: None,
                commit: true,
            },
            dir.path(),
        )
        .expect_err("error");
        assert!(matches!(error, CliRunError::UnknownDay(_)));
    }
}
