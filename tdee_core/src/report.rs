//! Human-readable formatting of calculation results.

use crate::session::Session;
use crate::tables::{ACTIVITY_FACTORS, GOAL_FACTORS};
use crate::{MacroGrams, MacroRatio, Stage};
use std::fmt;

/// Format an energy value as whole kcal with thousands separators
///
/// e.g. `2008.2` becomes `"2,008 kcal"`.
pub fn format_kcal(value: f64) -> String {
    format!("{} kcal", group_thousands(&format!("{:.0}", value)))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}

impl fmt::Display for MacroRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (protein, carbs, fat) = self.percentages();
        write!(
            f,
            "{}% Protein, {}% Carbohydrates, {}% Fat",
            protein, carbs, fat
        )
    }
}

impl fmt::Display for MacroGrams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} g protein, {:.0} g carbohydrates, {:.0} g fat",
            self.protein, self.carbs, self.fat
        )
    }
}

/// Heading and description shown above a stage's inputs
pub fn stage_intro(stage: Stage) -> (&'static str, &'static str) {
    match stage {
        Stage::Bmr => (
            "Basal Metabolic Rate (BMR) Calculator",
            "Enter your details below to estimate the number of calories your body burns at rest.",
        ),
        Stage::Tdee => (
            "Total Daily Energy Expenditure (TDEE) Calculator",
            "Select your activity level below to factor in total calories burned.",
        ),
        Stage::Goals => (
            "Fitness Goals Calculator",
            "Select your fitness goal below to determine your daily calorie intake and macro ratio.",
        ),
    }
}

/// Result lines for a computed stage; empty if the stage has no result
pub fn render_stage(session: &Session, stage: Stage) -> Vec<String> {
    match stage {
        Stage::Bmr => session
            .bmr()
            .map(|bmr| vec![format!("Basal Metabolic Rate (BMR): {}", format_kcal(bmr))])
            .unwrap_or_default(),
        Stage::Tdee => session
            .tdee()
            .map(|tdee| {
                vec![format!(
                    "Total Daily Energy Expenditure (TDEE): {}",
                    format_kcal(tdee)
                )]
            })
            .unwrap_or_default(),
        Stage::Goals => session
            .goals()
            .map(|plan| {
                vec![
                    format!("Daily Calorie Intake: {}", format_kcal(plan.calorie_intake)),
                    format!("Daily Macro Ratio (P:C:F): {}", plan.macro_ratio),
                    format!("Daily Macros: {}", plan.macro_grams()),
                ]
            })
            .unwrap_or_default(),
    }
}

/// Listing of both factor tables with their selection keys
pub fn render_tables() -> String {
    let mut out = String::from("Activity levels:\n");
    for activity in ACTIVITY_FACTORS {
        out.push_str(&format!(
            "  {:<10} x{:<6} {}\n",
            activity.key, activity.factor, activity.label
        ));
    }

    out.push_str("\nFitness goals:\n");
    for goal in GOAL_FACTORS {
        out.push_str(&format!(
            "  {:<12} x{:<5} {:<40} {}\n",
            goal.key, goal.calorie_goal, goal.label, goal.macro_goal
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Command;
    use crate::{Gender, UserProfile};

    #[test]
    fn test_format_kcal() {
        assert_eq!(format_kcal(2008.2), "2,008 kcal");
        assert_eq!(format_kcal(1264.0), "1,264 kcal");
        assert_eq!(format_kcal(999.4), "999 kcal");
        assert_eq!(format_kcal(1234567.0), "1,234,567 kcal");
        assert_eq!(format_kcal(-1500.0), "-1,500 kcal");
    }

    #[test]
    fn test_macro_ratio_display() {
        let ratio = MacroRatio::new(0.25, 0.45, 0.3);
        assert_eq!(
            ratio.to_string(),
            "25% Protein, 45% Carbohydrates, 30% Fat"
        );
    }

    #[test]
    fn test_render_stage_lines() {
        let mut session = Session::default();
        assert!(render_stage(&session, Stage::Bmr).is_empty());

        let profile = UserProfile::bounded(25, Gender::Female, 160.0, 55.0).unwrap();
        session.apply(Command::SubmitBmr(profile)).unwrap();
        assert_eq!(
            render_stage(&session, Stage::Bmr),
            vec!["Basal Metabolic Rate (BMR): 1,264 kcal".to_string()]
        );

        session.apply(Command::SubmitTdee("sedentary".into())).unwrap();
        session.apply(Command::SubmitGoals("cutting".into())).unwrap();
        let lines = render_stage(&session, Stage::Goals);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("40% Protein, 30% Carbohydrates, 30% Fat"));
    }

    #[test]
    fn test_render_tables_lists_every_entry() {
        let listing = render_tables();
        for activity in ACTIVITY_FACTORS {
            assert!(listing.contains(activity.label));
        }
        for goal in GOAL_FACTORS {
            assert!(listing.contains(goal.key));
        }
    }
}
