//! Built-in activity and goal factor tables.
//!
//! Entries are listed in display order. Lookups accept either the full label
//! or the short key.

use crate::types::MacroRatio;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Activity level multiplier applied to BMR
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityFactor {
    pub key: &'static str,
    pub label: &'static str,
    pub factor: f64,
}

/// Fitness goal: calorie multiplier applied to TDEE plus a macro split
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalFactor {
    pub key: &'static str,
    pub label: &'static str,
    pub calorie_goal: f64,
    pub macro_goal: MacroRatio,
}

pub static ACTIVITY_FACTORS: &[ActivityFactor] = &[
    ActivityFactor {
        key: "sedentary",
        label: "Sedentary (little or no exercise)",
        factor: 1.2,
    },
    ActivityFactor {
        key: "light",
        label: "Lightly Active (light exercise/sports 1-3 days/week)",
        factor: 1.375,
    },
    ActivityFactor {
        key: "moderate",
        label: "Moderately Active (moderate exercise/sports 3-5 days/week)",
        factor: 1.55,
    },
    ActivityFactor {
        key: "very",
        label: "Very Active (hard exercise/sports 6-7 days a week)",
        factor: 1.725,
    },
    ActivityFactor {
        key: "extreme",
        label: "Extremely Active (very hard exercise/physical job)",
        factor: 1.9,
    },
];

pub static GOAL_FACTORS: &[GoalFactor] = &[
    GoalFactor {
        key: "cutting",
        label: "Cutting (keep muscle and lose fat)",
        calorie_goal: 0.85,
        macro_goal: MacroRatio::new(0.4, 0.3, 0.3),
    },
    GoalFactor {
        key: "maintenance",
        label: "Maintenance",
        calorie_goal: 1.0,
        macro_goal: MacroRatio::new(0.25, 0.45, 0.3),
    },
    GoalFactor {
        key: "bulking",
        label: "Increase size (muscle gain)",
        calorie_goal: 1.15,
        macro_goal: MacroRatio::new(0.3, 0.5, 0.2),
    },
];

/// Label and lowercase key index over the activity table
static ACTIVITY_INDEX: Lazy<HashMap<&'static str, &'static ActivityFactor>> =
    Lazy::new(|| build_index(ACTIVITY_FACTORS, |a| (a.key, a.label)));

/// Label and lowercase key index over the goal table
static GOAL_INDEX: Lazy<HashMap<&'static str, &'static GoalFactor>> =
    Lazy::new(|| build_index(GOAL_FACTORS, |g| (g.key, g.label)));

fn build_index<T>(
    entries: &'static [T],
    names: impl Fn(&T) -> (&'static str, &'static str),
) -> HashMap<&'static str, &'static T> {
    let mut index = HashMap::with_capacity(entries.len() * 2);
    for entry in entries {
        let (key, label) = names(entry);
        index.insert(label, entry);
        index.insert(key, entry);
    }
    index
}

fn lookup<T>(index: &HashMap<&'static str, &'static T>, selection: &str) -> Option<&'static T> {
    index
        .get(selection)
        .or_else(|| index.get(selection.trim().to_lowercase().as_str()))
        .copied()
}

/// Resolve an activity selection by label or key
pub fn find_activity(selection: &str) -> Option<&'static ActivityFactor> {
    lookup(&ACTIVITY_INDEX, selection)
}

/// Resolve a goal selection by label or key
pub fn find_goal(selection: &str) -> Option<&'static GoalFactor> {
    lookup(&GOAL_INDEX, selection)
}

/// Check factor tables for structural problems
///
/// Returns a list of human-readable problems; empty means the tables are valid.
pub fn validate_tables(activities: &[ActivityFactor], goals: &[GoalFactor]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for activity in activities {
        if activity.key.is_empty() || activity.label.is_empty() {
            errors.push("Activity level has empty key or label".to_string());
        }
        if activity.factor.is_nan() || activity.factor <= 0.0 {
            errors.push(format!(
                "Activity level '{}' has non-positive factor {}",
                activity.key, activity.factor
            ));
        }
        for name in [activity.key, activity.label] {
            if !seen.insert(("activity", name)) {
                errors.push(format!("Duplicate activity level '{}'", name));
            }
        }
    }

    for goal in goals {
        if goal.key.is_empty() || goal.label.is_empty() {
            errors.push("Goal has empty key or label".to_string());
        }
        if goal.calorie_goal.is_nan() || goal.calorie_goal <= 0.0 {
            errors.push(format!(
                "Goal '{}' has non-positive calorie factor {}",
                goal.key, goal.calorie_goal
            ));
        }
        let sum = goal.macro_goal.sum();
        if (sum - 1.0).abs() > 1e-9 {
            errors.push(format!(
                "Goal '{}' macro ratio sums to {} instead of 1.0",
                goal.key, sum
            ));
        }
        for name in [goal.key, goal.label] {
            if !seen.insert(("goal", name)) {
                errors.push(format!("Duplicate goal '{}'", name));
            }
        }
    }

    errors
}

/// Validate the built-in tables
pub fn validate_default_tables() -> Vec<String> {
    validate_tables(ACTIVITY_FACTORS, GOAL_FACTORS)
}
