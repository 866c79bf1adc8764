//! BMR, TDEE and goal calculations.
//!
//! These are pure functions. Inputs are expected to be range-bounded by the
//! caller; the only failure is a selection missing from its factor table.

use crate::tables::{find_activity, find_goal};
use crate::{Error, Gender, GoalPlan, Result, SelectionKind};

/// Basal Metabolic Rate via the Mifflin-St Jeor equation
///
/// `height` in cm, `weight` in kg, result in kcal/day.
pub fn calculate_bmr(age: u32, gender: Gender, height: f64, weight: f64) -> f64 {
    let base = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age);
    match gender {
        Gender::Female => base - 161.0,
        Gender::Male => base + 5.0,
    }
}

/// Total Daily Energy Expenditure: BMR scaled by the activity factor
///
/// Returns [`Error::InvalidSelection`] when `activity_level` is neither a
/// label nor a key of the activity table.
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> Result<f64> {
    let activity = find_activity(activity_level).ok_or_else(|| Error::InvalidSelection {
        kind: SelectionKind::Activity,
        selection: activity_level.to_string(),
    })?;

    tracing::debug!(
        "Applying activity factor {} ({}) to BMR {:.1}",
        activity.factor,
        activity.key,
        bmr
    );
    Ok(bmr * activity.factor)
}

/// Daily calorie intake and macro ratio for a fitness goal
///
/// Returns [`Error::InvalidSelection`] when `goal` is neither a label nor a
/// key of the goal table.
pub fn determine_goals(tdee: f64, goal: &str) -> Result<GoalPlan> {
    let factors = find_goal(goal).ok_or_else(|| Error::InvalidSelection {
        kind: SelectionKind::Goal,
        selection: goal.to_string(),
    })?;

    tracing::debug!(
        "Applying goal '{}' (calorie factor {}) to TDEE {:.1}",
        factors.key,
        factors.calorie_goal,
        tdee
    );
    Ok(GoalPlan {
        calorie_intake: tdee * factors.calorie_goal,
        macro_ratio: factors.macro_goal,
    })
}
