//! Core domain types for the calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - The user profile and its input bounds
//! - Macro ratios and the computed goal plan
//! - Stages, stage status and notifications for the session flow

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

// ============================================================================
// Profile Types
// ============================================================================

/// Accepted age range in years
pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;

/// Accepted height range in centimetres
pub const HEIGHT_RANGE: RangeInclusive<f64> = 100.0..=250.0;

/// Accepted weight range in kilograms
pub const WEIGHT_RANGE: RangeInclusive<f64> = 30.0..=250.0;

/// Gender used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{}' (expected male or female)", other)),
        }
    }
}

/// Body measurements supplied for one BMR calculation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
}

impl UserProfile {
    /// Build a profile, rejecting values outside the input bounds.
    ///
    /// The calculation functions accept any value; this is the check the
    /// input layer applies before handing a profile to the session.
    pub fn bounded(age: u32, gender: Gender, height: f64, weight: f64) -> Result<Self> {
        check_bounds("age", f64::from(age), f64::from(*AGE_RANGE.start()), f64::from(*AGE_RANGE.end()))?;
        check_bounds("height", height, *HEIGHT_RANGE.start(), *HEIGHT_RANGE.end())?;
        check_bounds("weight", weight, *WEIGHT_RANGE.start(), *WEIGHT_RANGE.end())?;

        Ok(Self {
            age,
            gender,
            height,
            weight,
        })
    }

    /// Basal metabolic rate for this profile
    pub fn bmr(&self) -> f64 {
        crate::calc::calculate_bmr(self.age, self.gender, self.height, self.weight)
    }
}

/// Check a single input value against an inclusive range
pub fn check_bounds(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_nan() || value < min || value > max {
        return Err(Error::InputOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

// ============================================================================
// Goal Types
// ============================================================================

/// Share of daily calories from each macronutrient (sums to 1.0)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroRatio {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroRatio {
    pub const fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein,
            carbs,
            fat,
        }
    }

    pub fn sum(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }

    /// Integer percentages (protein, carbs, fat), truncated toward zero
    pub fn percentages(&self) -> (u32, u32, u32) {
        (
            (self.protein * 100.0) as u32,
            (self.carbs * 100.0) as u32,
            (self.fat * 100.0) as u32,
        )
    }
}

/// Energy per gram of each macronutrient
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Daily macronutrient amounts in grams
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroGrams {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Result of the goals stage: calorie intake plus macro split
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalPlan {
    pub calorie_intake: f64,
    pub macro_ratio: MacroRatio,
}

impl GoalPlan {
    /// Split the calorie intake into grams per macronutrient
    pub fn macro_grams(&self) -> MacroGrams {
        MacroGrams {
            protein: self.calorie_intake * self.macro_ratio.protein / KCAL_PER_GRAM_PROTEIN,
            carbs: self.calorie_intake * self.macro_ratio.carbs / KCAL_PER_GRAM_CARBS,
            fat: self.calorie_intake * self.macro_ratio.fat / KCAL_PER_GRAM_FAT,
        }
    }
}

// ============================================================================
// Session Flow Types
// ============================================================================

/// The three sequential stages of the calculator
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Bmr,
    Tdee,
    Goals,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Bmr, Stage::Tdee, Stage::Goals];

    /// The stage whose result this stage depends on
    pub fn upstream(self) -> Option<Stage> {
        match self {
            Stage::Bmr => None,
            Stage::Tdee => Some(Stage::Bmr),
            Stage::Goals => Some(Stage::Tdee),
        }
    }

    /// Stages that consume this stage's result, nearest first
    pub fn downstream(self) -> &'static [Stage] {
        match self {
            Stage::Bmr => &[Stage::Tdee, Stage::Goals],
            Stage::Tdee => &[Stage::Goals],
            Stage::Goals => &[],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Bmr => write!(f, "BMR"),
            Stage::Tdee => write!(f, "TDEE"),
            Stage::Goals => write!(f, "Goals"),
        }
    }
}

/// Visibility and progress of a single stage
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Hidden,
    AwaitingInput,
    Computed,
}

/// What happens to downstream results when an upstream result changes
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DownstreamPolicy {
    /// Clear downstream results so they must be recalculated
    #[default]
    Invalidate,
    /// Leave downstream results in place until they are recalculated
    KeepStale,
}

/// Which factor table a selection was looked up in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionKind {
    Activity,
    Goal,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Activity => write!(f, "activity level"),
            SelectionKind::Goal => write!(f, "goals"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// User-visible message produced by a session transition
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Notification {
    pub stage: Stage,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_profile_accepts_edges() {
        assert!(UserProfile::bounded(1, Gender::Male, 100.0, 30.0).is_ok());
        assert!(UserProfile::bounded(120, Gender::Female, 250.0, 250.0).is_ok());
    }

    #[test]
    fn test_bounded_profile_rejects_out_of_range() {
        let err = UserProfile::bounded(0, Gender::Male, 170.0, 70.0).unwrap_err();
        assert!(matches!(err, Error::InputOutOfRange { field: "age", .. }));

        let err = UserProfile::bounded(30, Gender::Male, 99.5, 70.0).unwrap_err();
        assert!(matches!(err, Error::InputOutOfRange { field: "height", .. }));

        let err = UserProfile::bounded(30, Gender::Male, 170.0, 250.1).unwrap_err();
        assert!(matches!(err, Error::InputOutOfRange { field: "weight", .. }));

        assert!(UserProfile::bounded(30, Gender::Male, f64::NAN, 70.0).is_err());
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" m ".parse::<Gender>().unwrap(), Gender::Male);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_macro_percentages_truncate() {
        let ratio = MacroRatio::new(0.25, 0.45, 0.3);
        assert_eq!(ratio.percentages(), (25, 45, 30));

        let uneven = MacroRatio::new(0.333, 0.333, 0.334);
        assert_eq!(uneven.percentages(), (33, 33, 33));
    }

    #[test]
    fn test_macro_grams() {
        let plan = GoalPlan {
            calorie_intake: 2000.0,
            macro_ratio: MacroRatio::new(0.3, 0.5, 0.2),
        };
        let grams = plan.macro_grams();
        assert!((grams.protein - 150.0).abs() < 1e-9);
        assert!((grams.carbs - 250.0).abs() < 1e-9);
        assert!((grams.fat - 2000.0 * 0.2 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_stage_dependencies() {
        assert_eq!(Stage::Bmr.upstream(), None);
        assert_eq!(Stage::Goals.upstream(), Some(Stage::Tdee));
        assert_eq!(Stage::Bmr.downstream(), &[Stage::Tdee, Stage::Goals]);
        assert!(Stage::Goals.downstream().is_empty());
    }
}
