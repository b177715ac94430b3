use crate::domain::DayPlan;
use std::collections::BTreeMap;

/// Sort key for day labels like "Monday (Chest)": weekday first,
/// unknown labels after the week in alphabetical order.
pub fn day_order(label: &str) -> u8 {
    let weekday = label.split_whitespace().next().unwrap_or("");
    match weekday {
        "Monday" => 0,
        "Tuesday" => 1,
        "Wednesday" => 2,
        "Thursday" => 3,
        "Friday" => 4,
        "Saturday" => 5,
        "Sunday" => 6,
        _ => 7,
    }
}

pub fn ordered_day_labels(plan: &BTreeMap<String, DayPlan>) -> Vec<String> {
    let mut labels: Vec<String> = plan.keys().cloned().collect();
    labels.sort_by(|a, b| day_order(a).cmp(&day_order(b)).then_with(|| a.cmp(b)));
    labels
}

/// Exercise name from a plan line like
/// "Chest Press Machine: 5 sets of 4-6 reps (heavy)".
pub fn workout_exercise_name(workout: &str) -> &str {
    workout.split(':').next().unwrap_or(workout).trim()
}

/// Built-in plan used when no plan document has been saved yet.
pub fn default_plan() -> BTreeMap<String, DayPlan> {
    let mut days = BTreeMap::new();

    days.insert(
        "Monday (Chest)".to_string(),
        DayPlan {
            warm_up: "Chest Press Machine (Light) - 2 sets of 12-15 reps".to_string(),
            workouts: vec![
                "Chest Press Machine: 5 sets of 4-6 reps (heavy)".to_string(),
                "Incline Chest Press Machine: 4 sets of 6-8 reps".to_string(),
                "Pec Deck (Chest Fly Machine): 4 sets of 10-12 reps".to_string(),
                "Decline Chest Press Machine: 4 sets of 6-8 reps".to_string(),
                "Cable Crossovers (High to Low): 4 sets of 10-12 reps".to_string(),
                "Push-Ups (Weighted, Optional): 3 sets to failure".to_string(),
            ],
            cardio: "15 minutes incline treadmill walk".to_string(),
        },
    );

    days.insert(
        "Tuesday (Back)".to_string(),
        DayPlan {
            warm_up: "Lat Pulldown (Light) - 2 sets of 12-15 reps".to_string(),
            workouts: vec![
                "Barbell Row: 5 sets of 4-6 reps (heavy)".to_string(),
                "Lat Pulldown (Wide Grip): 4 sets of 8-10 reps".to_string(),
                "Seated Cable Row: 4 sets of 8-10 reps".to_string(),
                "Single-Arm Dumbbell Row: 4 sets of 6-8 reps per side".to_string(),
                "Face Pulls: 4 sets of 12-15 reps".to_string(),
            ],
            cardio: "10 minutes rowing machine".to_string(),
        },
    );

    days.insert(
        "Wednesday (Legs)".to_string(),
        DayPlan {
            warm_up: "Bodyweight Squats - 2 sets of 15 reps".to_string(),
            workouts: vec![
                "Barbell Back Squat: 5 sets of 4-6 reps (heavy)".to_string(),
                "Leg Press: 4 sets of 8-10 reps".to_string(),
                "Romanian Deadlift: 4 sets of 6-8 reps".to_string(),
                "Leg Extension: 3 sets of 12-15 reps".to_string(),
                "Seated Calf Raise: 4 sets of 12-15 reps".to_string(),
            ],
            cardio: "10 minutes incline treadmill walk".to_string(),
        },
    );

    days.insert(
        "Thursday (Shoulders)".to_string(),
        DayPlan {
            warm_up: "Dumbbell Lateral Raise (Light) - 2 sets of 12-15 reps".to_string(),
            workouts: vec![
                "Seated Dumbbell Shoulder Press: 5 sets of 4-6 reps (heavy)".to_string(),
                "Dumbbell Lateral Raise: 4 sets of 10-12 reps".to_string(),
                "Rear Delt Fly Machine: 4 sets of 10-12 reps".to_string(),
                "Barbell Shrugs: 4 sets of 8-10 reps".to_string(),
            ],
            cardio: "15 minutes stationary bike".to_string(),
        },
    );

    days.insert(
        "Friday (Biceps & Triceps)".to_string(),
        DayPlan {
            warm_up: "Cable Curls (Light) - 2 sets of 12-15 reps".to_string(),
            workouts: vec![
                "Barbell Curl: 4 sets of 6-8 reps".to_string(),
                "Close-Grip Bench Press: 4 sets of 6-8 reps".to_string(),
                "Incline Dumbbell Curl: 3 sets of 8-10 reps".to_string(),
                "Overhead Cable Tricep Extension: 3 sets of 10-12 reps".to_string(),
                "Hammer Curls: 3 sets of 10-12 reps".to_string(),
                "Tricep Rope Pushdown: 3 sets of 10-12 reps".to_string(),
            ],
            cardio: "10 minutes incline treadmill walk".to_string(),
        },
    );

    days.insert(
        "Saturday (Run)".to_string(),
        DayPlan {
            warm_up: "5 minutes brisk walk + dynamic stretches".to_string(),
            workouts: Vec::new(),
            cardio: "30-45 minute outdoor run, easy pace".to_string(),
        },
    );

    days.insert(
        "Sunday (Rest)".to_string(),
        DayPlan {
            warm_up: String::new(),
            workouts: Vec::new(),
            cardio: "Optional: light stretching or a walk".to_string(),
        },
    );

    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_covers_seven_days() {
        let plan = default_plan();
        assert_eq!(plan.len(), 7);
        assert!(plan.contains_key("Monday (Chest)"));
        assert!(plan["Sunday (Rest)"].is_rest_day());
    }

    #[test]
    fn day_labels_order_by_weekday_not_alphabet() {
        let plan = default_plan();
        let labels = ordered_day_labels(&plan);
        assert_eq!(labels[0], "Monday (Chest)");
        assert_eq!(labels[6], "Sunday (Rest)");
    }

    #[test]
    fn workout_exercise_name_strips_the_prescription() {
        assert_eq!(
            workout_exercise_name("Chest Press Machine: 5 sets of 4-6 reps (heavy)"),
            "Chest Press Machine"
        );
        assert_eq!(workout_exercise_name("Push-Ups"), "Push-Ups");
    }

    #[test]
    fn unknown_labels_sort_after_the_week() {
        let mut plan = default_plan();
        plan.insert("Deload".to_string(), DayPlan::default());
        let labels = ordered_day_labels(&plan);
        assert_eq!(labels.last().map(String::as_str), Some("Deload"));
    }
}
