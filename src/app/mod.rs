use crate::domain::{
    SetId, Tracker, WorkoutSet, local_now, ordered_day_labels, workout_exercise_name,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ResolveDataDir(#[from] crate::infra::ResolveDataDirError),
}

#[derive(Clone, Debug)]
pub struct AppModel {
    pub tracker: Tracker,
    pub data_dir: PathBuf,
    pub view: View,
    pub terminal_size: (u16, u16),
    pub notice: Option<String>,
}

impl AppModel {
    pub fn new(tracker: Tracker, data_dir: PathBuf) -> Self {
        Self {
            tracker,
            data_dir,
            view: View::Week(WeekView::new()),
            terminal_size: (0, 0),
            notice: None,
        }
    }

    pub fn day_labels(&self) -> Vec<String> {
        ordered_day_labels(self.tracker.plan())
    }
}

#[derive(Clone, Debug)]
pub enum View {
    Week(WeekView),
    Day(DayView),
    SetEntry(SetEntryView),
    ExerciseHistory(ExerciseHistoryView),
}

#[derive(Clone, Debug)]
pub struct WeekView {
    pub selected: usize,
}

impl WeekView {
    pub fn new() -> Self {
        Self { selected: 0 }
    }
}

impl Default for WeekView {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct DayView {
    pub day: String,
    pub selected: usize,
}

impl DayView {
    pub fn new(day: String) -> Self {
        Self { day, selected: 0 }
    }
}

/// One selectable row in the day view: a planned (or ad-hoc) exercise,
/// or one of its uncommitted draft sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DayRow {
    Exercise(String),
    Draft { exercise: String, id: SetId },
}

/// Rows for the day view: each exercise followed by its draft sets,
/// then any draft exercises that are not on the plan.
pub fn day_rows(tracker: &Tracker, day: &str) -> Vec<DayRow> {
    let mut rows = Vec::new();
    let mut planned: Vec<String> = Vec::new();

    if let Some(plan) = tracker.day_plan(day) {
        for workout in &plan.workouts {
            let exercise = workout_exercise_name(workout).to_string();
            rows.push(DayRow::Exercise(exercise.clone()));
            for set in tracker.session_sets_for(&exercise) {
                rows.push(DayRow::Draft {
                    exercise: exercise.clone(),
                    id: set.id,
                });
            }
            planned.push(exercise);
        }
    }

    for (exercise, sets) in tracker.session() {
        if planned.iter().any(|name| name == exercise) {
            continue;
        }
        rows.push(DayRow::Exercise(exercise.clone()));
        for set in sets {
            rows.push(DayRow::Draft {
                exercise: exercise.clone(),
                id: set.id,
            });
        }
    }

    rows
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WeightUnit {
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Kg => "kg",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Lbs => Self::Kg,
            Self::Kg => Self::Lbs,
        }
    }
}

/// Splits a stored weight string into the numeric prefix the entry
/// form can edit and the recognized unit suffix (lbs when absent).
pub fn split_weight(weight: &str) -> (String, WeightUnit) {
    let trimmed = weight.trim();
    let unit = if trimmed.ends_with("kg") {
        WeightUnit::Kg
    } else {
        WeightUnit::Lbs
    };
    let amount: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    (amount, unit)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryField {
    Weight,
    Reps,
    Notes,
}

impl EntryField {
    fn next(self) -> Self {
        match self {
            Self::Weight => Self::Reps,
            Self::Reps => Self::Notes,
            Self::Notes => Self::Weight,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Weight => Self::Notes,
            Self::Reps => Self::Weight,
            Self::Notes => Self::Reps,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SetEntryView {
    pub day: String,
    pub exercise_name: String,
    pub editing: Option<SetId>,
    pub weight: String,
    pub unit: WeightUnit,
    pub reps: u32,
    pub notes: String,
    pub field: EntryField,
}

impl SetEntryView {
    /// Blank form for a new set, pre-filled with the last committed
    /// weight for the exercise on this day when one exists.
    pub fn for_new_set(tracker: &Tracker, day: &str, exercise_name: &str) -> Self {
        let (weight, unit) = tracker
            .last_weight(exercise_name, day)
            .map(split_weight)
            .unwrap_or((String::new(), WeightUnit::Lbs));
        Self {
            day: day.to_string(),
            exercise_name: exercise_name.to_string(),
            editing: None,
            weight,
            unit,
            reps: 8,
            notes: String::new(),
            field: EntryField::Weight,
        }
    }

    pub fn for_existing_set(day: &str, set: &WorkoutSet) -> Self {
        let (weight, unit) = split_weight(&set.weight);
        Self {
            day: day.to_string(),
            exercise_name: set.exercise_name.clone(),
            editing: Some(set.id),
            weight,
            unit,
            reps: set.reps,
            notes: set.notes.clone().unwrap_or_default(),
            field: EntryField::Weight,
        }
    }

    pub fn weight_string(&self) -> String {
        format!("{} {}", self.weight.trim(), self.unit.label())
    }

    fn notes_value(&self) -> Option<String> {
        let trimmed = self.notes.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExerciseHistoryView {
    pub day: String,
    pub exercise_name: String,
    pub scroll: u16,
}

impl ExerciseHistoryView {
    pub fn new(day: String, exercise_name: String) -> Self {
        Self {
            day,
            exercise_name,
            scroll: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
}

/// Side effects the event loop performs. Pure state changes happen
/// inside `update`; committing needs disk I/O and so goes through the
/// loop.
#[derive(Clone, Debug)]
pub enum AppCommand {
    None,
    Quit,
    CommitSession { day: String },
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key),
    }
}

fn update_on_key(model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    model.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return (model, AppCommand::Quit);
    }

    let view = std::mem::replace(&mut model.view, View::Week(WeekView::new()));
    match view {
        View::Week(view) => update_week(model, view, key),
        View::Day(view) => update_day(model, view, key),
        View::SetEntry(view) => update_set_entry(model, view, key),
        View::ExerciseHistory(view) => update_exercise_history(model, view, key),
    }
}

fn update_week(mut model: AppModel, mut view: WeekView, key: KeyEvent) -> (AppModel, AppCommand) {
    let labels = model.day_labels();

    match key.code {
        KeyCode::Char('q') => {
            model.view = View::Week(view);
            return (model, AppCommand::Quit);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view.selected = view.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !labels.is_empty() {
                view.selected = (view.selected + 1).min(labels.len() - 1);
            }
        }
        KeyCode::Enter => {
            if let Some(day) = labels.get(view.selected) {
                let day = day.clone();
                model.tracker.select_day(&day);
                model.view = View::Day(DayView::new(day));
                return (model, AppCommand::None);
            }
        }
        _ => {}
    }

    model.view = View::Week(view);
    (model, AppCommand::None)
}

fn update_day(mut model: AppModel, mut view: DayView, key: KeyEvent) -> (AppModel, AppCommand) {
    let rows = day_rows(&model.tracker, &view.day);

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            let selected = model
                .day_labels()
                .iter()
                .position(|label| *label == view.day)
                .unwrap_or(0);
            model.view = View::Week(WeekView { selected });
            return (model, AppCommand::None);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view.selected = view.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !rows.is_empty() {
                view.selected = (view.selected + 1).min(rows.len() - 1);
            }
        }
        KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('e') => match rows.get(view.selected) {
            Some(DayRow::Exercise(exercise)) => {
                let form = SetEntryView::for_new_set(&model.tracker, &view.day, exercise);
                model.view = View::SetEntry(form);
                return (model, AppCommand::None);
            }
            Some(DayRow::Draft { id, .. }) => {
                let set = model
                    .tracker
                    .session_sets()
                    .into_iter()
                    .find(|set| set.id == *id)
                    .cloned();
                if let Some(set) = set {
                    model.view = View::SetEntry(SetEntryView::for_existing_set(&view.day, &set));
                    return (model, AppCommand::None);
                }
            }
            None => {}
        },
        KeyCode::Char('h') => {
            if let Some(row) = rows.get(view.selected) {
                let exercise = match row {
                    DayRow::Exercise(exercise) => exercise.clone(),
                    DayRow::Draft { exercise, .. } => exercise.clone(),
                };
                model.view =
                    View::ExerciseHistory(ExerciseHistoryView::new(view.day.clone(), exercise));
                return (model, AppCommand::None);
            }
        }
        KeyCode::Char('d') | KeyCode::Char('x') => {
            if let Some(DayRow::Draft { id, .. }) = rows.get(view.selected) {
                model.tracker.remove_set(*id);
                let remaining = day_rows(&model.tracker, &view.day).len();
                view.selected = view.selected.min(remaining.saturating_sub(1));
            }
        }
        KeyCode::Char('c') => {
            let day = view.day.clone();
            model.view = View::Day(view);
            return (model, AppCommand::CommitSession { day });
        }
        _ => {}
    }

    model.view = View::Day(view);
    (model, AppCommand::None)
}

fn update_set_entry(
    mut model: AppModel,
    mut view: SetEntryView,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    match key.code {
        KeyCode::Esc => {
            model.view = View::Day(DayView::new(view.day));
            return (model, AppCommand::None);
        }
        KeyCode::Tab | KeyCode::Down => {
            view.field = view.field.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            view.field = view.field.previous();
        }
        KeyCode::Left => match view.field {
            EntryField::Weight => view.unit = view.unit.toggle(),
            EntryField::Reps => view.reps = view.reps.saturating_sub(1).max(1),
            EntryField::Notes => {}
        },
        KeyCode::Right => match view.field {
            EntryField::Weight => view.unit = view.unit.toggle(),
            EntryField::Reps => view.reps = (view.reps + 1).min(999),
            EntryField::Notes => {}
        },
        KeyCode::Backspace => match view.field {
            EntryField::Weight => {
                view.weight.pop();
            }
            EntryField::Reps => view.reps /= 10,
            EntryField::Notes => {
                view.notes.pop();
            }
        },
        KeyCode::Char(c) => match view.field {
            EntryField::Weight => {
                if c.is_ascii_digit() || c == '.' {
                    view.weight.push(c);
                }
            }
            EntryField::Reps => {
                if let Some(digit) = c.to_digit(10) {
                    view.reps = (view.reps * 10 + digit).min(999);
                }
            }
            EntryField::Notes => view.notes.push(c),
        },
        KeyCode::Enter => {
            if view.weight.trim().is_empty() {
                model.notice = Some("Enter a weight first".to_string());
                model.view = View::SetEntry(view);
                return (model, AppCommand::None);
            }
            if view.reps == 0 {
                model.notice = Some("Enter at least one rep".to_string());
                model.view = View::SetEntry(view);
                return (model, AppCommand::None);
            }

            let weight = view.weight_string();
            let notes = view.notes_value();
            match view.editing {
                Some(id) => {
                    model
                        .tracker
                        .update_set(id, &view.exercise_name, &weight, view.reps, notes);
                }
                None => {
                    model.tracker.add_set(
                        &view.exercise_name,
                        &weight,
                        view.reps,
                        notes,
                        local_now(),
                    );
                }
            }
            model.view = View::Day(DayView::new(view.day));
            return (model, AppCommand::None);
        }
        _ => {}
    }

    model.view = View::SetEntry(view);
    (model, AppCommand::None)
}

fn update_exercise_history(
    mut model: AppModel,
    mut view: ExerciseHistoryView,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            model.view = View::Day(DayView::new(view.day));
            return (model, AppCommand::None);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view.scroll = view.scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view.scroll = view.scroll.saturating_add(1);
        }
        _ => {}
    }

    model.view = View::ExerciseHistory(view);
    (model, AppCommand::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_plan;
    use std::collections::BTreeMap;

    fn model() -> AppModel {
        let tracker = Tracker::new(default_plan(), BTreeMap::new(), Vec::new());
        AppModel::new(tracker, PathBuf::from("/tmp/gaingrid-test"))
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::from(code))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn press(model: AppModel, code: KeyCode) -> (AppModel, AppCommand) {
        update(model, key(code))
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let (_, command) = update(model(), ctrl('c'));
        assert!(matches!(command, AppCommand::Quit));
    }

    #[test]
    fn entering_a_day_selects_it_on_the_tracker() {
        let (model, _) = press(model(), KeyCode::Enter);

        assert_eq!(model.tracker.selected_day(), Some("Monday (Chest)"));
        match &model.view {
            View::Day(view) => assert_eq!(view.day, "Monday (Chest)"),
            other => panic!("expected day view, got {other:?}"),
        }
    }

    #[test]
    fn week_selection_moves_in_weekday_order() {
        let (model, _) = press(model(), KeyCode::Down);
        let (model, _) = press(model, KeyCode::Enter);

        assert_eq!(model.tracker.selected_day(), Some("Tuesday (Back)"));
    }

    #[test]
    fn set_entry_flow_adds_a_draft_set() {
        let (model, _) = press(model(), KeyCode::Enter);
        let (model, _) = press(model, KeyCode::Enter);
        match &model.view {
            View::SetEntry(view) => {
                assert_eq!(view.exercise_name, "Chest Press Machine");
                assert!(view.editing.is_none());
            }
            other => panic!("expected set entry view, got {other:?}"),
        }

        let (model, _) = press(model, KeyCode::Char('1'));
        let (model, _) = press(model, KeyCode::Char('3'));
        let (model, _) = press(model, KeyCode::Char('5'));
        let (model, _) = press(model, KeyCode::Enter);

        let sets = model.tracker.session_sets_for("Chest Press Machine");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].weight, "135 lbs");
        assert_eq!(sets[0].reps, 8);
        assert!(matches!(model.view, View::Day(_)));
    }

    #[test]
    fn empty_weight_blocks_saving_with_a_notice() {
        let (model, _) = press(model(), KeyCode::Enter);
        let (model, _) = press(model, KeyCode::Enter);
        let (model, _) = press(model, KeyCode::Enter);

        assert_eq!(model.notice.as_deref(), Some("Enter a weight first"));
        assert!(matches!(model.view, View::SetEntry(_)));
        assert!(model.tracker.session_is_empty());
    }

    #[test]
    fn editing_a_draft_set_preserves_its_id() {
        let mut base = model();
        base.tracker.select_day("Monday (Chest)");
        let id = base
            .tracker
            .add_set("Chest Press Machine", "135 lbs", 8, None, local_now());
        base.view = View::Day(DayView::new("Monday (Chest)".to_string()));

        // Row 0 is the exercise, row 1 its draft set.
        let (base, _) = press(base, KeyCode::Down);
        let (base, _) = press(base, KeyCode::Enter);
        match &base.view {
            View::SetEntry(view) => {
                assert_eq!(view.editing, Some(id));
                assert_eq!(view.weight, "135");
                assert_eq!(view.unit, WeightUnit::Lbs);
            }
            other => panic!("expected set entry view, got {other:?}"),
        }

        let (base, _) = press(base, KeyCode::Backspace);
        let (base, _) = press(base, KeyCode::Backspace);
        let (base, _) = press(base, KeyCode::Char('4'));
        let (base, _) = press(base, KeyCode::Char('5'));
        let (base, _) = press(base, KeyCode::Enter);

        let sets = base.tracker.session_sets_for("Chest Press Machine");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, id);
        assert_eq!(sets[0].weight, "145 lbs");
    }

    #[test]
    fn delete_key_removes_the_selected_draft() {
        let mut base = model();
        base.tracker.select_day("Monday (Chest)");
        base.tracker
            .add_set("Chest Press Machine", "135 lbs", 8, None, local_now());
        base.view = View::Day(DayView::new("Monday (Chest)".to_string()));

        let (base, _) = press(base, KeyCode::Down);
        let (base, _) = press(base, KeyCode::Char('d'));

        assert!(base.tracker.session_is_empty());
    }

    #[test]
    fn commit_key_defers_to_the_event_loop() {
        let mut base = model();
        base.tracker.select_day("Monday (Chest)");
        base.view = View::Day(DayView::new("Monday (Chest)".to_string()));

        let (_, command) = press(base, KeyCode::Char('c'));
        match command {
            AppCommand::CommitSession { day } => assert_eq!(day, "Monday (Chest)"),
            other => panic!("expected commit command, got {other:?}"),
        }
    }

    #[test]
    fn new_set_form_prefills_the_last_committed_weight() {
        let mut base = model();
        base.tracker.select_day("Monday (Chest)");
        base.tracker
            .add_set("Chest Press Machine", "60kg", 6, None, local_now());
        let payload = base
            .tracker
            .prepare_commit("Monday (Chest)", local_now())
            .expect("payload");
        base.tracker.apply_commit(payload);

        let form = SetEntryView::for_new_set(&base.tracker, "Monday (Chest)", "Chest Press Machine");
        assert_eq!(form.weight, "60");
        assert_eq!(form.unit, WeightUnit::Kg);
    }

    #[test]
    fn split_weight_recognizes_units() {
        assert_eq!(split_weight("135 lbs"), ("135".to_string(), WeightUnit::Lbs));
        assert_eq!(split_weight("60kg"), ("60".to_string(), WeightUnit::Kg));
        assert_eq!(split_weight("12.5 kg"), ("12.5".to_string(), WeightUnit::Kg));
        assert_eq!(split_weight("bodyweight"), (String::new(), WeightUnit::Lbs));
    }

    #[test]
    fn day_rows_interleave_exercises_and_drafts() {
        let mut base = model();
        base.tracker.select_day("Monday (Chest)");
        let id = base
            .tracker
            .add_set("Chest Press Machine", "135 lbs", 8, None, local_now());
        base.tracker
            .add_set("Farmer Carry", "70 lbs", 1, None, local_now());

        let rows = day_rows(&base.tracker, "Monday (Chest)");
        assert_eq!(rows[0], DayRow::Exercise("Chest Press Machine".to_string()));
        assert_eq!(
            rows[1],
            DayRow::Draft {
                exercise: "Chest Press Machine".to_string(),
                id,
            }
        );
        // Ad-hoc draft exercises come after the planned list.
        assert!(rows.contains(&DayRow::Exercise("Farmer Carry".to_string())));
    }
}
