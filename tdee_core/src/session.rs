//! Stage-gated session flow.
//!
//! A [`Session`] owns the three derived values (BMR, TDEE, goals) of one
//! interactive run. Each stage becomes visible only once the previous stage
//! holds a positive result. User actions arrive as [`Command`]s; each one is a
//! single atomic transition that returns a [`Notification`] for the UI.

use crate::report::format_kcal;
use crate::tables::{find_activity, find_goal};
use crate::{
    calc, DownstreamPolicy, Error, GoalPlan, MacroGrams, MacroRatio, Notification, Result,
    Stage, StageStatus, UserProfile,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user-triggered calculation
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SubmitBmr(UserProfile),
    SubmitTdee(String),
    SubmitGoals(String),
}

impl Command {
    pub fn stage(&self) -> Stage {
        match self {
            Command::SubmitBmr(_) => Stage::Bmr,
            Command::SubmitTdee(_) => Stage::Tdee,
            Command::SubmitGoals(_) => Stage::Goals,
        }
    }
}

/// State of one calculator session
#[derive(Clone, Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    policy: DownstreamPolicy,
    profile: Option<UserProfile>,
    bmr: Option<f64>,
    activity: Option<&'static str>,
    tdee: Option<f64>,
    goal: Option<&'static str>,
    goals: Option<GoalPlan>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DownstreamPolicy::default())
    }
}

impl Session {
    /// Start a session with every stage unset
    pub fn new(policy: DownstreamPolicy) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            policy,
            profile: None,
            bmr: None,
            activity: None,
            tdee: None,
            goal: None,
            goals: None,
        };
        tracing::debug!("Started session {} ({:?})", session.id, policy);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn policy(&self) -> DownstreamPolicy {
        self.policy
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn bmr(&self) -> Option<f64> {
        self.bmr
    }

    pub fn tdee(&self) -> Option<f64> {
        self.tdee
    }

    pub fn goals(&self) -> Option<&GoalPlan> {
        self.goals.as_ref()
    }

    /// Label of the activity level behind the current TDEE
    pub fn activity_label(&self) -> Option<&'static str> {
        self.activity
    }

    /// Label of the goal behind the current goal plan
    pub fn goal_label(&self) -> Option<&'static str> {
        self.goal
    }

    fn value(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Bmr => self.bmr,
            Stage::Tdee => self.tdee,
            Stage::Goals => self.goals.map(|g| g.calorie_intake),
        }
    }

    fn is_computed(&self, stage: Stage) -> bool {
        self.value(stage).is_some()
    }

    /// Current status of a stage
    ///
    /// A stage is hidden until its upstream stage holds a result above zero.
    pub fn status(&self, stage: Stage) -> StageStatus {
        if let Some(upstream) = stage.upstream() {
            if !self.value(upstream).is_some_and(|v| v > 0.0) {
                return StageStatus::Hidden;
            }
        }
        if self.is_computed(stage) {
            StageStatus::Computed
        } else {
            StageStatus::AwaitingInput
        }
    }

    /// Stages the UI should currently show, in order
    pub fn visible_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|s| self.status(*s) != StageStatus::Hidden)
            .collect()
    }

    /// First visible stage still waiting for input, if any
    pub fn next_pending(&self) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|s| self.status(*s) == StageStatus::AwaitingInput)
    }

    /// Apply one user action
    ///
    /// Unknown activity or goal selections are recovered here: the stage's
    /// result is reset to unset and an error notification is returned.
    /// Triggering a hidden stage fails with [`Error::StageUnavailable`].
    pub fn apply(&mut self, command: Command) -> Result<Notification> {
        let stage = command.stage();
        if self.status(stage) == StageStatus::Hidden {
            tracing::warn!("Rejected {} calculation: stage is hidden", stage);
            return Err(Error::StageUnavailable(stage));
        }

        match command {
            Command::SubmitBmr(profile) => {
                let bmr = profile.bmr();
                tracing::info!("Calculated BMR {:.1} for {:?}", bmr, profile);
                self.profile = Some(profile);
                self.bmr = Some(bmr);
                self.invalidate_downstream(Stage::Bmr);
                Ok(Notification::success(stage, "BMR calculation complete!"))
            }

            Command::SubmitTdee(selection) => {
                let bmr = self.bmr.unwrap_or(0.0);
                match calc::calculate_tdee(bmr, &selection) {
                    Ok(tdee) => {
                        tracing::info!("Calculated TDEE {:.1} ({})", tdee, selection);
                        self.tdee = Some(tdee);
                        self.activity = find_activity(&selection).map(|a| a.label);
                        self.invalidate_downstream(Stage::Tdee);
                        Ok(Notification::success(stage, "TDEE calculation complete!"))
                    }
                    Err(err) => self.recover(stage, err),
                }
            }

            Command::SubmitGoals(selection) => {
                let tdee = self.tdee.unwrap_or(0.0);
                match calc::determine_goals(tdee, &selection) {
                    Ok(plan) => {
                        tracing::info!(
                            "Calculated goals: {:.1} kcal ({})",
                            plan.calorie_intake,
                            selection
                        );
                        self.goals = Some(plan);
                        self.goal = find_goal(&selection).map(|g| g.label);
                        Ok(Notification::success(stage, "Goals calculation complete!"))
                    }
                    Err(err) => self.recover(stage, err),
                }
            }
        }
    }

    fn recover(&mut self, stage: Stage, err: Error) -> Result<Notification> {
        let (kind, selection) = match err {
            Error::InvalidSelection { kind, selection } => (kind, selection),
            other => return Err(other),
        };

        tracing::warn!("Invalid {} selection '{}'", kind, selection);
        self.clear(stage);
        self.invalidate_downstream(stage);
        Ok(Notification::error(stage, format!("Invalid {} selected.", kind)))
    }

    fn clear(&mut self, stage: Stage) {
        match stage {
            Stage::Bmr => {
                self.profile = None;
                self.bmr = None;
            }
            Stage::Tdee => {
                self.activity = None;
                self.tdee = None;
            }
            Stage::Goals => {
                self.goal = None;
                self.goals = None;
            }
        }
    }

    fn invalidate_downstream(&mut self, stage: Stage) {
        if self.policy == DownstreamPolicy::KeepStale {
            return;
        }
        for downstream in stage.downstream() {
            if self.is_computed(*downstream) {
                tracing::debug!("Invalidating {} after {} changed", downstream, stage);
            }
            self.clear(*downstream);
        }
    }

    /// Serializable snapshot of the session's results
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            started_at: self.started_at,
            generated_at: Utc::now(),
            profile: self.profile,
            bmr_kcal: self.bmr,
            bmr_display: self.bmr.map(format_kcal),
            activity_level: self.activity.map(str::to_string),
            tdee_kcal: self.tdee,
            tdee_display: self.tdee.map(format_kcal),
            goal: self.goal.map(str::to_string),
            calorie_intake_kcal: self.goals.map(|g| g.calorie_intake),
            calorie_intake_display: self.goals.map(|g| format_kcal(g.calorie_intake)),
            macro_ratio: self.goals.map(|g| g.macro_ratio),
            macro_ratio_display: self.goals.map(|g| g.macro_ratio.to_string()),
            macro_grams: self.goals.map(|g| g.macro_grams()),
        }
    }
}

/// Results of a session as written by `--json`
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub profile: Option<UserProfile>,
    pub bmr_kcal: Option<f64>,
    pub bmr_display: Option<String>,
    pub activity_level: Option<String>,
    pub tdee_kcal: Option<f64>,
    pub tdee_display: Option<String>,
    pub goal: Option<String>,
    pub calorie_intake_kcal: Option<f64>,
    pub calorie_intake_display: Option<String>,
    pub macro_ratio: Option<MacroRatio>,
    pub macro_ratio_display: Option<String>,
    pub macro_grams: Option<MacroGrams>,
}
