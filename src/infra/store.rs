use crate::domain::{DayPlan, LocalCommit, WorkoutHistory, default_plan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveDataDirError {
    #[error("could not determine home directory")]
    HomeDirNotFound,
}

/// Root of the on-disk data directory: `GAINGRID_DATA_DIR` when set,
/// otherwise `~/.gaingrid`.
pub fn resolve_data_dir() -> Result<PathBuf, ResolveDataDirError> {
    if let Some(override_dir) = std::env::var_os("GAINGRID_DATA_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = dirs::home_dir() else {
        return Err(ResolveDataDirError::HomeDirNotFound);
    };

    Ok(home.join(".gaingrid"))
}

#[derive(Debug, Error)]
pub enum LoadPlanError {
    #[error("failed to read weekly plan: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse weekly plan: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SavePlanError {
    #[error("failed to encode weekly plan: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write weekly plan: {0}")]
    Write(#[from] io::Error),
}

fn plan_path(data_dir: &Path) -> PathBuf {
    data_dir.join("plan.json")
}

/// Loads the weekly plan. A missing document yields the built-in
/// default plan; a corrupt one is an error the caller decides about.
pub fn load_plan(data_dir: &Path) -> Result<BTreeMap<String, DayPlan>, LoadPlanError> {
    let path = plan_path(data_dir);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(default_plan());
        }
        Err(error) => return Err(error.into()),
    };

    let file: PlanFile = serde_json::from_str(&raw)?;
    Ok(file.days)
}

pub fn save_plan(data_dir: &Path, days: &BTreeMap<String, DayPlan>) -> Result<(), SavePlanError> {
    fs::create_dir_all(data_dir)?;

    let path = plan_path(data_dir);
    let tmp = path.with_extension("json.tmp");
    let file = PlanFile {
        version: 1,
        days: days.clone(),
    };
    let text = serde_json::to_string_pretty(&file)?;
    fs::write(&tmp, text)?;
    fs::rename(tmp, path)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum LoadHistoryError {
    #[error("failed to read workout history: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse workout history: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SaveHistoryError {
    #[error("failed to encode workout history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write workout history: {0}")]
    Write(#[from] io::Error),
}

fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join("history.json")
}

/// Loads the per-day workout history. Missing document means no
/// history yet.
pub fn load_history(
    data_dir: &Path,
) -> Result<BTreeMap<String, Vec<WorkoutHistory>>, LoadHistoryError> {
    let path = history_path(data_dir);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(BTreeMap::new());
        }
        Err(error) => return Err(error.into()),
    };

    let file: HistoryFile = serde_json::from_str(&raw)?;
    Ok(file.days)
}

pub fn save_history(
    data_dir: &Path,
    days: &BTreeMap<String, Vec<WorkoutHistory>>,
) -> Result<(), SaveHistoryError> {
    fs::create_dir_all(data_dir)?;

    let path = history_path(data_dir);
    let tmp = path.with_extension("json.tmp");
    let file = HistoryFile {
        version: 1,
        days: days.clone(),
    };
    let text = serde_json::to_string_pretty(&file)?;
    fs::write(&tmp, text)?;
    fs::rename(tmp, path)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum LoadCommitsError {
    #[error("failed to read commits directory: {0}")]
    Read(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SaveCommitError {
    #[error("failed to encode commit record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write commit record: {0}")]
    Write(#[from] io::Error),
}

/// Commit records plus the number of files that could not be read or
/// parsed. Unreadable records are skipped, never fatal.
#[derive(Clone, Debug, Default)]
pub struct LoadedCommits {
    pub commits: Vec<LocalCommit>,
    pub skipped: usize,
}

fn commits_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("commits")
}

/// Loads every commit record under `commits/`, sorted by timestamp
/// ascending. A missing directory means no commits yet.
pub fn load_commits(data_dir: &Path) -> Result<LoadedCommits, LoadCommitsError> {
    let dir = commits_dir(data_dir);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(LoadedCommits::default());
        }
        Err(error) => return Err(error.into()),
    };

    let mut loaded = LoadedCommits::default();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        let Ok(raw) = fs::read_to_string(&path) else {
            loaded.skipped += 1;
            continue;
        };
        match serde_json::from_str::<CommitFile>(&raw) {
            Ok(file) => loaded.commits.push(file.commit),
            Err(_) => loaded.skipped += 1,
        }
    }

    loaded.commits.sort_by_key(|commit| commit.timestamp);
    Ok(loaded)
}

pub fn save_commit(data_dir: &Path, commit: &LocalCommit) -> Result<(), SaveCommitError> {
    let dir = commits_dir(data_dir);
    fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{}.json", commit.id));
    let tmp = path.with_extension("json.tmp");
    let file = CommitFile {
        version: 1,
        commit: commit.clone(),
    };
    let text = serde_json::to_string_pretty(&file)?;
    fs::write(&tmp, text)?;
    fs::rename(tmp, path)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum PersistSessionCommitError {
    #[error(transparent)]
    History(#[from] SaveHistoryError),

    #[error(transparent)]
    Commit(#[from] SaveCommitError),
}

/// Persists everything one commit operation produces: the updated
/// history document first, then the commit record. On failure the
/// in-memory session must be left untouched by the caller.
pub fn persist_session_commit(
    data_dir: &Path,
    days: &BTreeMap<String, Vec<WorkoutHistory>>,
    commit: &LocalCommit,
) -> Result<(), PersistSessionCommitError> {
    save_history(data_dir, days)?;
    save_commit(data_dir, commit)?;
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PlanFile {
    version: u32,
    days: BTreeMap<String, DayPlan>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    days: BTreeMap<String, Vec<WorkoutHistory>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CommitFile {
    version: u32,
    commit: LocalCommit,
}
