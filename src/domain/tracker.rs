use crate::domain::{
    CommitId, DayPlan, DayProgress, LocalCommit, SetId, WorkoutHistory, WorkoutSet,
    commits_by_date, generate_session_report,
};
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};

/// The Session & History Engine. Owns the draft session (uncommitted
/// sets, keyed by exercise), the per-day history, and the commit
/// records the activity heatmap is derived from. All operations are
/// in-memory; persistence happens between `prepare_commit` and
/// `apply_commit` in the caller.
#[derive(Clone, Debug, Default)]
pub struct Tracker {
    plan: BTreeMap<String, DayPlan>,
    session: BTreeMap<String, Vec<WorkoutSet>>,
    history_by_day: BTreeMap<String, Vec<WorkoutHistory>>,
    commits: Vec<LocalCommit>,
    selected_day: Option<String>,
}

/// Everything one commit operation produces. Built by
/// `prepare_commit`, persisted by the caller, then folded into the
/// in-memory state by `apply_commit`.
#[derive(Clone, Debug)]
pub struct SessionCommit {
    pub day: String,
    pub history: WorkoutHistory,
    pub commit: LocalCommit,
}

/// One calendar day of an exercise's history, derived from the
/// per-day history map. Recomputed on every query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExerciseDayHistory {
    pub date: Date,
    pub sets: Vec<WorkoutSet>,
}

impl Tracker {
    pub fn new(
        plan: BTreeMap<String, DayPlan>,
        history_by_day: BTreeMap<String, Vec<WorkoutHistory>>,
        commits: Vec<LocalCommit>,
    ) -> Self {
        Self {
            plan,
            session: BTreeMap::new(),
            history_by_day,
            commits,
            selected_day: None,
        }
    }

    pub fn plan(&self) -> &BTreeMap<String, DayPlan> {
        &self.plan
    }

    pub fn day_plan(&self, day: &str) -> Option<&DayPlan> {
        self.plan.get(day)
    }

    pub fn selected_day(&self) -> Option<&str> {
        self.selected_day.as_deref()
    }

    /// Selecting a different day abandons the current draft session
    /// without confirmation.
    pub fn select_day(&mut self, day: &str) {
        if self.selected_day.as_deref() != Some(day) {
            self.session.clear();
        }
        self.selected_day = Some(day.to_string());
    }

    pub fn session(&self) -> &BTreeMap<String, Vec<WorkoutSet>> {
        &self.session
    }

    pub fn session_is_empty(&self) -> bool {
        self.session.values().all(Vec::is_empty)
    }

    pub fn session_set_count(&self) -> usize {
        self.session.values().map(Vec::len).sum()
    }

    /// Draft sets flattened in exercise order, logging order within an
    /// exercise.
    pub fn session_sets(&self) -> Vec<&WorkoutSet> {
        self.session.values().flatten().collect()
    }

    pub fn session_sets_for(&self, exercise: &str) -> &[WorkoutSet] {
        self.session
            .get(exercise)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Logs a set into the draft session. The engine does not validate
    /// the weight format or rep count; input constraints live in the
    /// presentation layer.
    pub fn add_set(
        &mut self,
        exercise_name: &str,
        weight: &str,
        reps: u32,
        notes: Option<String>,
        now: OffsetDateTime,
    ) -> SetId {
        let set = WorkoutSet {
            id: SetId::generate(),
            exercise_name: exercise_name.to_string(),
            notes,
            weight: weight.to_string(),
            reps,
            date: now,
        };
        let id = set.id;
        self.session
            .entry(exercise_name.to_string())
            .or_default()
            .push(set);
        id
    }

    /// Replaces a draft set in place, preserving its id and original
    /// timestamp. Unknown ids are a silent no-op. A changed exercise
    /// name moves the set to the end of the new exercise's list.
    pub fn update_set(
        &mut self,
        id: SetId,
        exercise_name: &str,
        weight: &str,
        reps: u32,
        notes: Option<String>,
    ) {
        let Some((current_exercise, index)) = self.find_session_set(id) else {
            return;
        };

        let original = self.session[&current_exercise][index].clone();
        let replacement = WorkoutSet {
            id: original.id,
            exercise_name: exercise_name.to_string(),
            notes,
            weight: weight.to_string(),
            reps,
            date: original.date,
        };

        if current_exercise == exercise_name {
            if let Some(sets) = self.session.get_mut(&current_exercise) {
                sets[index] = replacement;
            }
            return;
        }

        if let Some(sets) = self.session.get_mut(&current_exercise) {
            sets.remove(index);
            if sets.is_empty() {
                self.session.remove(&current_exercise);
            }
        }
        self.session
            .entry(exercise_name.to_string())
            .or_default()
            .push(replacement);
    }

    /// Removes a draft set. Unknown ids are a silent no-op. Committed
    /// history is never touched.
    pub fn remove_set(&mut self, id: SetId) {
        let Some((exercise, index)) = self.find_session_set(id) else {
            return;
        };
        if let Some(sets) = self.session.get_mut(&exercise) {
            sets.remove(index);
            if sets.is_empty() {
                self.session.remove(&exercise);
            }
        }
    }

    fn find_session_set(&self, id: SetId) -> Option<(String, usize)> {
        for (exercise, sets) in &self.session {
            if let Some(index) = sets.iter().position(|set| set.id == id) {
                return Some((exercise.clone(), index));
            }
        }
        None
    }

    /// Builds the commit payload for the current session, or `None`
    /// when there is nothing to commit. Pure: the session is untouched
    /// until `apply_commit`.
    pub fn prepare_commit(&self, day: &str, now: OffsetDateTime) -> Option<SessionCommit> {
        if self.session_is_empty() {
            return None;
        }

        let sets: Vec<WorkoutSet> = self.session.values().flatten().cloned().collect();
        let history = WorkoutHistory {
            id: CommitId::generate(),
            date: now,
            sets,
        };

        let content = generate_session_report(&self.session, now);
        let commit = LocalCommit {
            id: CommitId::generate(),
            message: format!("Completed {day} workout"),
            timestamp: now,
            file_name: format!("workout_{}.md", now.unix_timestamp()),
            content,
        };

        Some(SessionCommit {
            day: day.to_string(),
            history,
            commit,
        })
    }

    /// Folds a persisted commit payload into the in-memory state:
    /// appends the history entry, records the activity unit, clears
    /// the session. Call only after the gateway accepted the payload.
    pub fn apply_commit(&mut self, payload: SessionCommit) {
        self.history_by_day
            .entry(payload.day)
            .or_default()
            .push(payload.history);
        self.commits.push(payload.commit);
        self.session.clear();
    }

    pub fn history_by_day(&self) -> &BTreeMap<String, Vec<WorkoutHistory>> {
        &self.history_by_day
    }

    /// Full history for a day, chronological ascending. Unknown days
    /// yield an empty slice.
    pub fn workout_history(&self, day: &str) -> &[WorkoutHistory] {
        self.history_by_day
            .get(day)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn last_workout(&self, day: &str) -> Option<&WorkoutHistory> {
        self.workout_history(day).last()
    }

    /// Derived projection: every committed set for an exercise across
    /// all days, grouped by the commit's calendar day, sets in logging
    /// order, most recent day first.
    pub fn exercise_history(&self, exercise_name: &str) -> Vec<ExerciseDayHistory> {
        let mut by_date: BTreeMap<Date, Vec<WorkoutSet>> = BTreeMap::new();
        for histories in self.history_by_day.values() {
            for history in histories {
                for set in &history.sets {
                    if set.exercise_name == exercise_name {
                        by_date.entry(history.date.date()).or_default().push(set.clone());
                    }
                }
            }
        }

        let mut days: Vec<ExerciseDayHistory> = by_date
            .into_iter()
            .map(|(date, mut sets)| {
                sets.sort_by_key(|set| set.date);
                ExerciseDayHistory { date, sets }
            })
            .collect();
        days.sort_by(|a, b| b.date.cmp(&a.date));
        days
    }

    /// Weight string of the most recent committed set for an exercise
    /// on a day, if any. Used to pre-fill the entry form.
    pub fn last_weight(&self, exercise_name: &str, day: &str) -> Option<&str> {
        for history in self.workout_history(day).iter().rev() {
            for set in history.sets.iter().rev() {
                if set.exercise_name == exercise_name {
                    return Some(&set.weight);
                }
            }
        }
        None
    }

    /// Summary of the draft session for a day. Meaningful only while
    /// that day is selected and has draft sets; empty otherwise.
    /// `total_weight` sums the leading digits of each weight string
    /// and is unit-blind.
    pub fn todays_progress(&self, day: &str) -> DayProgress {
        if self.selected_day.as_deref() != Some(day) || self.session_is_empty() {
            return DayProgress::EMPTY;
        }

        let completed_sets = self.session_set_count();
        let total_weight = self
            .session
            .values()
            .flatten()
            .map(|set| leading_weight_value(&set.weight))
            .sum();
        DayProgress {
            is_complete: false,
            completed_sets: Some(completed_sets),
            total_weight: Some(total_weight),
        }
    }

    pub fn commits(&self) -> &[LocalCommit] {
        &self.commits
    }

    pub fn commits_by_date(&self) -> BTreeMap<Date, u32> {
        commits_by_date(&self.commits)
    }
}

/// Best-effort numeric reading of a free-form weight string: the
/// leading run of ASCII digits, or 0 when there is none.
pub fn leading_weight_value(weight: &str) -> u32 {
    let digits: String = weight
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
