use crate::domain::WorkoutSet;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::macros::format_description;

/// Renders the Markdown report persisted inside a commit record: one
/// `##` section per exercise, sets in logging order, the notes suffix
/// only when notes are present.
pub fn generate_session_report(
    session: &BTreeMap<String, Vec<WorkoutSet>>,
    committed_at: OffsetDateTime,
) -> String {
    let mut markdown = format!("# Workout Session - {}\n\n", medium_date(committed_at));

    for (exercise, sets) in session {
        if sets.is_empty() {
            continue;
        }

        markdown.push_str(&format!("## {exercise}\n\n"));
        for set in sets {
            markdown.push_str(&format!("- Weight: {}, Reps: {}", set.weight, set.reps));
            if let Some(notes) = set.notes.as_deref() {
                if !notes.is_empty() {
                    markdown.push_str(&format!(" (Notes: {notes})"));
                }
            }
            markdown.push('\n');
        }
        markdown.push('\n');
    }

    markdown
}

fn medium_date(value: OffsetDateTime) -> String {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    value
        .format(&format)
        .unwrap_or_else(|_| value.date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SetId;
    use time::macros::datetime;

    fn set(exercise: &str, weight: &str, reps: u32, notes: Option<&str>) -> WorkoutSet {
        WorkoutSet {
            id: SetId::generate(),
            exercise_name: exercise.to_string(),
            notes: notes.map(str::to_string),
            weight: weight.to_string(),
            reps,
            date: datetime!(2025-01-20 18:30:00 UTC),
        }
    }

    #[test]
    fn report_has_header_sections_and_set_lines() {
        let mut session = BTreeMap::new();
        session.insert(
            "Bench Press".to_string(),
            vec![
                set("Bench Press", "135 lbs", 8, None),
                set("Bench Press", "145 lbs", 6, Some("felt heavy")),
            ],
        );
        session.insert(
            "Pec Deck".to_string(),
            vec![set("Pec Deck", "90 lbs", 12, None)],
        );

        let report = generate_session_report(&session, datetime!(2025-01-20 18:30:00 UTC));

        assert!(report.starts_with("# Workout Session - Jan 20, 2025\n\n"));
        assert!(report.contains("## Bench Press\n\n- Weight: 135 lbs, Reps: 8\n"));
        assert!(report.contains("- Weight: 145 lbs, Reps: 6 (Notes: felt heavy)\n"));
        assert!(report.contains("## Pec Deck\n\n- Weight: 90 lbs, Reps: 12\n"));
    }

    #[test]
    fn notes_suffix_omitted_when_absent_or_empty() {
        let mut session = BTreeMap::new();
        session.insert(
            "Squat".to_string(),
            vec![set("Squat", "225 lbs", 5, Some(""))],
        );

        let report = generate_session_report(&session, datetime!(2025-01-20 18:30:00 UTC));
        assert!(report.contains("- Weight: 225 lbs, Reps: 5\n"));
        assert!(!report.contains("Notes:"));
    }

    #[test]
    fn empty_exercise_groups_are_skipped() {
        let mut session = BTreeMap::new();
        session.insert("Deadlift".to_string(), Vec::new());

        let report = generate_session_report(&session, datetime!(2025-01-20 18:30:00 UTC));
        assert!(!report.contains("## Deadlift"));
    }
}
