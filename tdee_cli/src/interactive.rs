//! Terminal rendition of the three-stage calculator form.
//!
//! Each stage is prompted only once the session reports it as visible. After
//! all stages are computed the user may re-trigger any of them.

use crate::input::{parse_age, parse_gender, parse_height, parse_weight};
use std::fmt::Display;
use std::io::{BufRead, Write};
use tdee_core::config::ProfileDefaults;
use tdee_core::report::{render_stage, stage_intro};
use tdee_core::tables::{find_activity, find_goal, ACTIVITY_FACTORS, GOAL_FACTORS};
use tdee_core::{Command, Config, Result, Session, Stage, UserProfile};

pub struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the form until the user finishes or input ends
    pub fn run(&mut self, config: &Config) -> Result<Session> {
        let mut session = Session::new(config.session.downstream);

        loop {
            let stage = match session.next_pending() {
                Some(stage) => stage,
                None => match self.choose_recalculation()? {
                    Some(stage) => stage,
                    None => break,
                },
            };

            let Some(command) = self.collect(stage, &config.defaults)? else {
                break;
            };

            let note = session.apply(command)?;
            if note.is_error() {
                writeln!(self.output, "✗ {}", note.message)?;
                continue;
            }

            writeln!(self.output, "✓ {}", note.message)?;
            for line in render_stage(&session, stage) {
                writeln!(self.output, "  {}", line)?;
            }
        }

        writeln!(self.output, "\nGoodbye!")?;
        Ok(session)
    }

    fn collect(&mut self, stage: Stage, defaults: &ProfileDefaults) -> Result<Option<Command>> {
        let (title, description) = stage_intro(stage);
        writeln!(self.output, "\n── {} ──", title)?;
        writeln!(self.output, "{}", description)?;

        let command = match stage {
            Stage::Bmr => self.collect_profile(defaults)?.map(Command::SubmitBmr),
            Stage::Tdee => {
                let labels: Vec<_> = ACTIVITY_FACTORS.iter().map(|a| a.label).collect();
                let default = defaults
                    .activity
                    .as_deref()
                    .and_then(find_activity)
                    .and_then(|a| labels.iter().position(|l| *l == a.label))
                    .unwrap_or(0);
                self.choose("Activity Level", &labels, default)?
                    .map(Command::SubmitTdee)
            }
            Stage::Goals => {
                let labels: Vec<_> = GOAL_FACTORS.iter().map(|g| g.label).collect();
                let default = defaults
                    .goal
                    .as_deref()
                    .and_then(find_goal)
                    .and_then(|g| labels.iter().position(|l| *l == g.label))
                    .unwrap_or(0);
                self.choose("Fitness Goal", &labels, default)?
                    .map(Command::SubmitGoals)
            }
        };
        Ok(command)
    }

    fn collect_profile(&mut self, defaults: &ProfileDefaults) -> Result<Option<UserProfile>> {
        let Some(age) = self.ask("Age (years)", defaults.age, parse_age)? else {
            return Ok(None);
        };
        let Some(gender) = self.ask("Gender (male/female)", defaults.gender, parse_gender)? else {
            return Ok(None);
        };
        let Some(height) = self.ask("Height (cm)", defaults.height, parse_height)? else {
            return Ok(None);
        };
        let Some(weight) = self.ask("Weight (kg)", defaults.weight, parse_weight)? else {
            return Ok(None);
        };

        UserProfile::bounded(age, gender, height, weight).map(Some)
    }

    /// List options and return the chosen label
    ///
    /// A number picks from the list; any other text is passed through as
    /// typed and resolved by the session.
    fn choose(&mut self, prompt: &str, labels: &[&str], default: usize) -> Result<Option<String>> {
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, label)?;
        }

        let Some(answer) = self.read_line(&format!("{} [{}]", prompt, default + 1))? else {
            return Ok(None);
        };

        let selection = if answer.is_empty() {
            labels[default].to_string()
        } else {
            match answer.parse::<usize>() {
                Ok(n) if (1..=labels.len()).contains(&n) => labels[n - 1].to_string(),
                _ => answer,
            }
        };
        Ok(Some(selection))
    }

    fn choose_recalculation(&mut self) -> Result<Option<Stage>> {
        writeln!(self.output)?;
        loop {
            let Some(answer) = self.read_line("Recalculate [b]mr, [t]dee, [g]oals, or Enter to finish")?
            else {
                return Ok(None);
            };

            match answer.to_lowercase().as_str() {
                "" | "q" => return Ok(None),
                "b" | "bmr" => return Ok(Some(Stage::Bmr)),
                "t" | "tdee" => return Ok(Some(Stage::Tdee)),
                "g" | "goals" => return Ok(Some(Stage::Goals)),
                other => writeln!(self.output, "  Unknown choice '{}'", other)?,
            }
        }
    }

    /// Prompt until a value parses; empty input takes the default
    fn ask<T, F>(&mut self, prompt: &str, default: T, parse: F) -> Result<Option<T>>
    where
        T: Display,
        F: Fn(&str) -> std::result::Result<T, String>,
    {
        loop {
            let Some(answer) = self.read_line(&format!("{} [{}]", prompt, default))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(msg) => writeln!(self.output, "  {}", msg)?,
            }
        }
    }

    /// Read one trimmed line; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdee_core::{DownstreamPolicy, StageStatus};

    fn run_form(input: &str, config: &Config) -> (Session, String) {
        let mut output = Vec::new();
        let session = Form::new(input.as_bytes(), &mut output).run(config).unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_defaults_walk_through_all_stages() {
        let (session, output) = run_form("\n\n\n\n\n\n\n", &Config::default());

        assert_eq!(session.bmr(), Some(1617.5));
        assert!(output.contains("Basal Metabolic Rate (BMR): 1,618 kcal"));
        assert!(output.contains("Total Daily Energy Expenditure (TDEE): 1,941 kcal"));
        assert!(output.contains("40% Protein, 30% Carbohydrates, 30% Fat"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_out_of_range_input_reprompts() {
        let (session, output) = run_form("200\n25\nfemale\n160\n55\n", &Config::default());

        assert!(output.contains("age must be between 1 and 120 (got 200)"));
        assert_eq!(session.bmr(), Some(1264.0));
        assert_eq!(session.status(Stage::Tdee), StageStatus::AwaitingInput);
    }

    #[test]
    fn test_typed_unknown_activity_reports_error() {
        let (session, output) = run_form("\n\n\n\nswimming\n3\n", &Config::default());

        assert!(output.contains("✗ Invalid activity level selected."));
        let expected = 1617.5 * 1.55;
        assert!((session.tdee().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_recalculation_invalidates_goals() {
        // all stages, then recalculate TDEE and stop at the goals prompt
        let (session, _) = run_form("\n\n\n\n1\n2\nt\n5\n", &Config::default());

        assert!((session.tdee().unwrap() - 1617.5 * 1.9).abs() < 1e-9);
        assert!(session.goals().is_none());
    }

    #[test]
    fn test_recalculation_keeps_stale_goals() {
        let mut config = Config::default();
        config.session.downstream = DownstreamPolicy::KeepStale;

        let (session, _) = run_form("\n\n\n\n1\n2\nt\n5\n\n", &config);

        let goals = session.goals().unwrap();
        assert!((goals.calorie_intake - 1617.5 * 1.2).abs() < 1e-9);
        assert_eq!(session.goal_label(), Some("Maintenance"));
    }

    #[test]
    fn test_configured_defaults_preselect() {
        let mut config = Config::default();
        config.defaults.activity = Some("very".into());
        config.defaults.goal = Some("bulking".into());

        let (session, output) = run_form("\n\n\n\n\n\n\n", &config);

        assert!(output.contains("Activity Level [4]"));
        assert!(output.contains("Fitness Goal [3]"));
        assert_eq!(session.goal_label(), Some("Increase size (muscle gain)"));
    }
}
