pub mod theme;

use crate::app::{
    AppModel, DayRow, DayView, EntryField, ExerciseHistoryView, SetEntryView, View, WeekView,
    day_rows,
};
use crate::domain::{activity_level, activity_window, local_now, ordered_day_labels};
use ratatui::prelude::*;
use ratatui::widgets::*;
use time::Date;
use time::macros::format_description;
use unicode_width::UnicodeWidthStr;

const HEATMAP_DAYS: u16 = 90;

pub fn render(frame: &mut Frame, model: &AppModel) {
    let full_area = frame.area();
    if full_area.width == 0 || full_area.height == 0 {
        return;
    }

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG).fg(theme::FG)),
        full_area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(full_area);

    render_title_bar(frame, chunks[0], model);

    match &model.view {
        View::Week(view) => render_week(frame, chunks[1], model, view),
        View::Day(view) => render_day(frame, chunks[1], model, view),
        View::SetEntry(view) => render_set_entry(frame, chunks[1], view),
        View::ExerciseHistory(view) => render_exercise_history(frame, chunks[1], model, view),
    }

    render_status_bar(frame, chunks[2], model);
}

fn render_title_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let title = match &model.view {
        View::Week(_) => " GainGrid — Weekly Plan ".to_string(),
        View::Day(view) => format!(" GainGrid — {} ", view.day),
        View::SetEntry(view) => format!(" GainGrid — {} ", view.exercise_name),
        View::ExerciseHistory(view) => format!(" GainGrid — {} history ", view.exercise_name),
    };
    let bar = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(theme::BAR_BG).fg(theme::FG));
    frame.render_widget(bar, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let (text, style) = match &model.notice {
        Some(notice) => (
            notice.clone(),
            Style::default().bg(theme::BAR_BG).fg(theme::ERROR),
        ),
        None => {
            let hints = match &model.view {
                View::Week(_) => " ↑/↓ select · Enter open day · q quit",
                View::Day(_) => {
                    " ↑/↓ select · Enter add/edit set · d delete · h history · c commit · Esc back"
                }
                View::SetEntry(_) => {
                    " Tab next field · ←/→ unit or reps · Enter save · Esc cancel"
                }
                View::ExerciseHistory(_) => " ↑/↓ scroll · Esc back",
            };
            (
                hints.to_string(),
                Style::default().bg(theme::BAR_BG).fg(theme::DIM),
            )
        }
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_week(frame: &mut Frame, area: Rect, model: &AppModel, view: &WeekView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(area);

    let labels = ordered_day_labels(model.tracker.plan());
    let items: Vec<ListItem> = labels
        .iter()
        .enumerate()
        .map(|(index, label)| day_card(model, label, index == view.selected))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .padding(Padding::horizontal(1))
            .title("This Week"),
    );
    frame.render_widget(list, chunks[0]);

    render_heatmap(frame, chunks[1], model);
}

fn day_card<'a>(model: &AppModel, label: &str, selected: bool) -> ListItem<'a> {
    let plan = model.tracker.day_plan(label);
    let summary = match plan {
        Some(plan) if plan.is_rest_day() => "Rest day".to_string(),
        Some(plan) if plan.workouts.is_empty() => plan.cardio.clone(),
        Some(plan) => format!("{} exercises", plan.workouts.len()),
        None => String::new(),
    };

    let last = model
        .tracker
        .last_workout(label)
        .map(|history| format!("last: {}", medium_date(history.date.date())));

    let progress = model.tracker.todays_progress(label);
    let pending = progress
        .completed_sets
        .map(|count| format!("{count} sets pending"));

    let mut spans = vec![
        Span::styled(
            format!("{label:<28}"),
            if selected {
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::FG)
            },
        ),
        Span::styled(summary, Style::default().fg(theme::MUTED)),
    ];
    if let Some(pending) = pending {
        spans.push(Span::styled(
            format!("  {pending}"),
            Style::default().fg(theme::ACCENT),
        ));
    }
    if let Some(last) = last {
        spans.push(Span::styled(
            format!("  {last}"),
            Style::default().fg(theme::DIM),
        ));
    }

    let style = if selected {
        Style::default().bg(theme::ACCENT_BG)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(spans)).style(style)
}

fn render_heatmap(frame: &mut Frame, area: Rect, model: &AppModel) {
    let counts = model.tracker.commits_by_date();
    let today = local_now().date();
    let window = activity_window(&counts, today, HEATMAP_DAYS);

    let inner_width = (area.width as usize).saturating_sub(4).max(1);
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    for (_, count) in &window {
        if current.len() >= inner_width {
            lines.push(Line::from(std::mem::take(&mut current)));
        }
        let level = activity_level(*count) as usize;
        current.push(Span::styled(
            "■",
            Style::default().fg(theme::HEAT[level]),
        ));
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }

    let active_days = window.iter().filter(|(_, count)| *count > 0).count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title(format!(
            "Activity — {active_days} active of last {HEATMAP_DAYS} days"
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_day(frame: &mut Frame, area: Rect, model: &AppModel, view: &DayView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_day_header(frame, chunks[0], model, view);

    let rows = day_rows(&model.tracker, &view.day);
    if rows.is_empty() {
        let message = match model.tracker.day_plan(&view.day) {
            Some(plan) if plan.is_rest_day() => "Rest day. Nothing to log.",
            _ => "No exercises planned for this day.",
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(theme::MUTED))
            .block(day_list_block());
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| day_row_item(model, view, row, index == view.selected))
        .collect();
    frame.render_widget(List::new(items).block(day_list_block()), chunks[1]);
}

fn day_list_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title("Session")
}

fn render_day_header(frame: &mut Frame, area: Rect, model: &AppModel, view: &DayView) {
    let mut lines = Vec::new();
    if let Some(plan) = model.tracker.day_plan(&view.day) {
        if !plan.warm_up.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Warm-up: ", Style::default().fg(theme::DIM)),
                Span::styled(plan.warm_up.clone(), Style::default().fg(theme::MUTED)),
            ]));
        }
        if !plan.cardio.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Cardio:  ", Style::default().fg(theme::DIM)),
                Span::styled(plan.cardio.clone(), Style::default().fg(theme::MUTED)),
            ]));
        }
    }

    if let Some(last) = model.tracker.last_workout(&view.day) {
        lines.push(Line::from(vec![
            Span::styled("Last:    ", Style::default().fg(theme::DIM)),
            Span::styled(
                format!("{} · {} sets", medium_date(last.date.date()), last.sets.len()),
                Style::default().fg(theme::MUTED),
            ),
        ]));
    }

    let progress = model.tracker.todays_progress(&view.day);
    if let (Some(sets), Some(weight)) = (progress.completed_sets, progress.total_weight) {
        lines.push(Line::from(Span::styled(
            format!("Draft: {sets} sets, ~{weight} total — press c to commit"),
            Style::default().fg(theme::ACCENT),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme::SURFACE)),
        area,
    );
}

fn day_row_item<'a>(
    model: &AppModel,
    view: &DayView,
    row: &DayRow,
    selected: bool,
) -> ListItem<'a> {
    let line = match row {
        DayRow::Exercise(exercise) => {
            let mut spans = vec![Span::styled(
                exercise.clone(),
                Style::default().fg(theme::FG).add_modifier(Modifier::BOLD),
            )];
            if let Some(weight) = model.tracker.last_weight(exercise, &view.day) {
                spans.push(Span::styled(
                    format!("  (last: {weight})"),
                    Style::default().fg(theme::DIM),
                ));
            }
            Line::from(spans)
        }
        DayRow::Draft { exercise, id } => {
            let set = model
                .tracker
                .session_sets_for(exercise)
                .iter()
                .find(|set| set.id == *id)
                .cloned();
            let text = match set {
                Some(set) => {
                    let notes = set
                        .notes
                        .as_deref()
                        .filter(|notes| !notes.is_empty())
                        .map(|notes| format!("  · {notes}"))
                        .unwrap_or_default();
                    format!("  {} × {}{notes}", set.weight, set.reps)
                }
                None => String::new(),
            };
            Line::from(Span::styled(text, Style::default().fg(theme::MUTED)))
        }
    };

    let style = if selected {
        Style::default().bg(theme::ACCENT_BG)
    } else {
        Style::default()
    };
    ListItem::new(line).style(style)
}

fn render_set_entry(frame: &mut Frame, area: Rect, view: &SetEntryView) {
    let width = area.width.min(46);
    let height = 10u16.min(area.height);
    let form_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let title = if view.editing.is_some() {
        "Edit Set"
    } else {
        "Add Set"
    };

    let field_line = |label: &str, value: String, field: EntryField| {
        let focused = view.field == field;
        let marker = if focused { "▸ " } else { "  " };
        Line::from(vec![
            Span::styled(
                format!("{marker}{label:<8}"),
                if focused {
                    Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::MUTED)
                },
            ),
            Span::styled(value, Style::default().fg(theme::FG)),
        ])
    };

    let weight_value = if view.weight.is_empty() {
        format!("_ {}", view.unit.label())
    } else {
        format!("{} {}", view.weight, view.unit.label())
    };
    let notes_value = if view.notes.is_empty() {
        "—".to_string()
    } else {
        view.notes.clone()
    };

    let lines = vec![
        Line::from(Span::styled(
            view.exercise_name.clone(),
            Style::default().fg(theme::FG).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field_line("Weight", weight_value, EntryField::Weight),
        field_line("Reps", view.reps.to_string(), EntryField::Reps),
        field_line("Notes", notes_value, EntryField::Notes),
    ];

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .padding(Padding::horizontal(1))
            .title(title)
            .style(Style::default().bg(theme::SURFACE)),
    );
    frame.render_widget(Clear, form_area);
    frame.render_widget(form, form_area);
}

fn render_exercise_history(
    frame: &mut Frame,
    area: Rect,
    model: &AppModel,
    view: &ExerciseHistoryView,
) {
    let days = model.tracker.exercise_history(&view.exercise_name);

    let mut lines: Vec<Line> = Vec::new();
    if days.is_empty() {
        lines.push(Line::from(Span::styled(
            "No committed sets for this exercise yet.",
            Style::default().fg(theme::MUTED),
        )));
    }
    for day in &days {
        lines.push(Line::from(Span::styled(
            medium_date(day.date),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )));
        for set in &day.sets {
            let notes = set
                .notes
                .as_deref()
                .filter(|notes| !notes.is_empty())
                .map(|notes| format!("  · {notes}"))
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("  {} × {}{notes}", set.weight, set.reps),
                Style::default().fg(theme::FG),
            )));
        }
        lines.push(Line::default());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title(truncate_title(
            format!("{} — every committed set", view.exercise_name),
            area.width,
        ));
    let paragraph = Paragraph::new(lines).block(block).scroll((view.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn truncate_title(title: String, width: u16) -> String {
    let max = (width as usize).saturating_sub(4);
    if UnicodeWidthStr::width(title.as_str()) <= max {
        return title;
    }
    let mut out = String::new();
    let mut used = 0;
    for c in title.chars() {
        let w = UnicodeWidthStr::width(c.to_string().as_str());
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn medium_date(date: Date) -> String {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    date.format(&format).unwrap_or_else(|_| date.to_string())
}
