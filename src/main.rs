mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppEvent, AppModel};
use crate::cli::CliInvocation;
use crate::domain::{Tracker, default_plan, local_now};
use crate::infra::{
    load_commits, load_history, load_plan, persist_session_commit, resolve_data_dir,
};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::collections::BTreeMap;
use std::io::{self, Stdout, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Tui => Ok(run_tui()?),
        CliInvocation::Command(command) => {
            let data_dir = resolve_data_dir().map_err(app::AppError::from)?;
            crate::cli::run(command, &data_dir)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} — personal workout tracker (weekly plan + set logging + activity heatmap)\n\nUSAGE:\n  {name}                                  Start the TUI\n  {name} plan [day]                       Print the weekly plan (or one day)\n  {name} history [day]                    List committed workouts, newest first\n  {name} sets <exercise>                  Every committed set for an exercise\n  {name} log <day> <exercise> <weight> <reps> [--notes TEXT] [--commit]\n                                          Log one set; --commit saves it to history\n  {name} activity [--days N]              Days with commits in the last N days (default: 90)\n  {name} --help | --version\n\nOUTPUT:\n  plan:     day<TAB>kind<TAB>text          (kind: warm-up|workout|cardio)\n  history:  committed_at<TAB>day<TAB>set_count\n  sets:     date<TAB>weight<TAB>reps<TAB>notes\n  activity: date<TAB>commit_count\n\nENV:\n  GAINGRID_DATA_DIR    Override the data directory (default: ~/.gaingrid)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn run_tui() -> Result<(), app::AppError> {
    let data_dir = resolve_data_dir()?;
    let mut notice: Option<String> = None;

    let plan = match load_plan(&data_dir) {
        Ok(plan) => plan,
        Err(error) => {
            notice = Some(format!("Plan reset to default (failed to load): {error}"));
            default_plan()
        }
    };
    let history = match load_history(&data_dir) {
        Ok(history) => history,
        Err(error) => {
            notice = Some(format!("History unavailable (failed to load): {error}"));
            BTreeMap::new()
        }
    };
    let commits = match load_commits(&data_dir) {
        Ok(loaded) => {
            if loaded.skipped > 0 {
                notice = Some(format!(
                    "Skipped {} unreadable commit records",
                    loaded.skipped
                ));
            }
            loaded.commits
        }
        Err(error) => {
            notice = Some(format!("Activity unavailable (failed to load): {error}"));
            Vec::new()
        }
    };

    let tracker = Tracker::new(plan, history, commits);
    let mut model = AppModel::new(tracker, data_dir);
    model.notice = notice;

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut model);
    let restore_result = restore_terminal(&mut terminal);
    result.and(restore_result)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    model: &mut AppModel,
) -> Result<(), app::AppError> {
    loop {
        terminal.draw(|frame| ui::render(frame, model))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    let (next, command) = app::update(model.clone(), AppEvent::Key(key));
                    *model = next;
                    match command {
                        AppCommand::None => {}
                        AppCommand::Quit => return Ok(()),
                        AppCommand::CommitSession { day } => commit_session(model, &day),
                    }
                }
                Event::Resize(width, height) => {
                    model.terminal_size = (width, height);
                }
                _ => {}
            }
        }
    }
}

/// Persists the session before mutating in-memory state. When the
/// gateway rejects the write the draft stays intact.
fn commit_session(model: &mut AppModel, day: &str) {
    let Some(payload) = model.tracker.prepare_commit(day, local_now()) else {
        model.notice = Some("Nothing to commit".to_string());
        return;
    };

    let mut days = model.tracker.history_by_day().clone();
    days.entry(payload.day.clone())
        .or_default()
        .push(payload.history.clone());

    match persist_session_commit(&model.data_dir, &days, &payload.commit) {
        Ok(()) => {
            let message = payload.commit.message.clone();
            model.tracker.apply_commit(payload);
            model.notice = Some(message);
        }
        Err(error) => {
            model.notice = Some(format!("Commit failed, session kept: {error}"));
        }
    }
}
