use crate::domain::LocalCommit;
use std::collections::BTreeMap;
use time::{Date, Duration};

/// Commits grouped by the local calendar day they were made on. One
/// increment per commit, regardless of how many sets it contained.
pub fn commits_by_date(commits: &[LocalCommit]) -> BTreeMap<Date, u32> {
    let mut counts: BTreeMap<Date, u32> = BTreeMap::new();
    for commit in commits {
        *counts.entry(commit.timestamp.date()).or_insert(0) += 1;
    }
    counts
}

/// Heatmap intensity bucket for a daily commit count.
pub fn activity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => 3,
    }
}

/// The trailing `days` calendar days ending at `today` (oldest first),
/// each paired with its commit count.
pub fn activity_window(
    counts: &BTreeMap<Date, u32>,
    today: Date,
    days: u16,
) -> Vec<(Date, u32)> {
    let mut window = Vec::with_capacity(days as usize);
    for back in (0..i64::from(days)).rev() {
        let date = today.saturating_sub(Duration::days(back));
        let count = counts.get(&date).copied().unwrap_or(0);
        window.push((date, count));
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommitId;
    use time::macros::{date, datetime};

    fn commit_at(timestamp: time::OffsetDateTime) -> LocalCommit {
        LocalCommit {
            id: CommitId::generate(),
            message: "Completed Monday (Chest) workout".to_string(),
            timestamp,
            file_name: "workout_0.md".to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn groups_commits_by_calendar_day() {
        let commits = vec![
            commit_at(datetime!(2025-01-20 07:00:00 UTC)),
            commit_at(datetime!(2025-01-20 19:00:00 UTC)),
            commit_at(datetime!(2025-01-22 08:00:00 UTC)),
        ];

        let counts = commits_by_date(&commits);
        assert_eq!(counts.get(&date!(2025 - 01 - 20)), Some(&2));
        assert_eq!(counts.get(&date!(2025 - 01 - 21)), None);
        assert_eq!(counts.get(&date!(2025 - 01 - 22)), Some(&1));
    }

    #[test]
    fn levels_cap_at_three() {
        assert_eq!(activity_level(0), 0);
        assert_eq!(activity_level(1), 1);
        assert_eq!(activity_level(2), 2);
        assert_eq!(activity_level(3), 3);
        assert_eq!(activity_level(12), 3);
    }

    #[test]
    fn window_is_oldest_first_and_zero_filled() {
        let commits = vec![commit_at(datetime!(2025-01-20 07:00:00 UTC))];
        let counts = commits_by_date(&commits);

        let window = activity_window(&counts, date!(2025 - 01 - 21), 3);
        assert_eq!(
            window,
            vec![
                (date!(2025 - 01 - 19), 0),
                (date!(2025 - 01 - 20), 1),
                (date!(2025 - 01 - 21), 0),
            ]
        );
    }
}
