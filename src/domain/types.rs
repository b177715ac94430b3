use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(Uuid);

impl SetId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(Uuid);

impl CommitId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One performed set. Immutable once committed; within the draft
/// session it may be replaced wholesale by id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: SetId,
    #[serde(rename = "exerciseName")]
    pub exercise_name: String,
    pub notes: Option<String>,
    pub weight: String,
    pub reps: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// A committed session snapshot. `date` is the commit time, not the
/// timestamp of any individual set.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistory {
    pub id: CommitId,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub sets: Vec<WorkoutSet>,
}

/// The durable record of one commit operation: a human-readable
/// session report plus metadata. One of these per activity unit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LocalCommit {
    pub id: CommitId,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub content: String,
}

/// Prescribed template for one weekday. Empty warm-up and workouts
/// mean a rest day.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(rename = "warmUp")]
    pub warm_up: String,
    pub workouts: Vec<String>,
    pub cardio: String,
}

impl DayPlan {
    pub fn is_rest_day(&self) -> bool {
        self.warm_up.is_empty() && self.workouts.is_empty()
    }
}

/// Summary of the uncommitted session for one day. Both optional
/// fields are absent unless that day is selected and has draft sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DayProgress {
    pub is_complete: bool,
    pub completed_sets: Option<usize>,
    pub total_weight: Option<u32>,
}

impl DayProgress {
    pub const EMPTY: Self = Self {
        is_complete: false,
        completed_sets: None,
        total_weight: None,
    };
}

/// Current instant in the local offset, falling back to UTC when the
/// local offset cannot be determined. Calendar-day grouping uses the
/// offset stored on each timestamp.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn format_rfc3339(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn workout_set_round_trips_with_id_and_timestamp() {
        let set = WorkoutSet {
            id: SetId::generate(),
            exercise_name: "Bench Press".to_string(),
            notes: Some("paused reps".to_string()),
            weight: "135 lbs".to_string(),
            reps: 8,
            date: datetime!(2025-01-20 18:30:00 -6),
        };

        let json = serde_json::to_string(&set).expect("encode");
        let parsed: WorkoutSet = serde_json::from_str(&json).expect("decode");
        assert_eq!(parsed, set);
    }

    #[test]
    fn workout_set_uses_original_field_names() {
        let set = WorkoutSet {
            id: SetId::generate(),
            exercise_name: "Pec Deck".to_string(),
            notes: None,
            weight: "90 lbs".to_string(),
            reps: 12,
            date: datetime!(2025-01-20 18:30:00 UTC),
        };

        let json = serde_json::to_string(&set).expect("encode");
        assert!(json.contains("\"exerciseName\""));
        assert!(json.contains("\"notes\":null"));
    }

    #[test]
    fn day_plan_rest_day_when_empty() {
        assert!(DayPlan::default().is_rest_day());
        let plan = DayPlan {
            warm_up: String::new(),
            workouts: vec!["Squat".to_string()],
            cardio: String::new(),
        };
        assert!(!plan.is_rest_day());
    }
}
