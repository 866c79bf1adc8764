//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/tdee/config.toml`.

use crate::tables::{find_activity, find_goal};
use crate::types::{check_bounds, AGE_RANGE, HEIGHT_RANGE, WEIGHT_RANGE};
use crate::{DownstreamPolicy, Error, Gender, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: ProfileDefaults,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Values pre-filled into the inputs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default = "default_age")]
    pub age: u32,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default = "default_height")]
    pub height: f64,

    #[serde(default = "default_weight")]
    pub weight: f64,

    /// Pre-selected activity level (label or key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,

    /// Pre-selected goal (label or key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            age: default_age(),
            gender: Gender::default(),
            height: default_height(),
            weight: default_weight(),
            activity: None,
            goal: None,
        }
    }
}

/// Session flow configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub downstream: DownstreamPolicy,
}

// Default value functions
fn default_age() -> u32 {
    30
}

fn default_height() -> f64 {
    170.0
}

fn default_weight() -> f64 {
    70.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        base.join("tdee").join("config.toml")
    }

    /// Check that defaults fall inside the input bounds and selections exist
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        let bounded = [
            ("age", f64::from(d.age), f64::from(*AGE_RANGE.start()), f64::from(*AGE_RANGE.end())),
            ("height", d.height, *HEIGHT_RANGE.start(), *HEIGHT_RANGE.end()),
            ("weight", d.weight, *WEIGHT_RANGE.start(), *WEIGHT_RANGE.end()),
        ];
        for (field, value, min, max) in bounded {
            check_bounds(field, value, min, max)
                .map_err(|e| Error::Config(format!("defaults.{}", e)))?;
        }

        if let Some(ref activity) = d.activity {
            if find_activity(activity).is_none() {
                return Err(Error::Config(format!(
                    "defaults.activity '{}' is not a known activity level",
                    activity
                )));
            }
        }
        if let Some(ref goal) = d.goal {
            if d.activity.is_none() {
                return Err(Error::Config(format!(
                    "defaults.goal '{}' requires defaults.activity",
                    goal
                )));
            }
            if find_goal(goal).is_none() {
                return Err(Error::Config(format!(
                    "defaults.goal '{}' is not a known goal",
                    goal
                )));
            }
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.age, 30);
        assert_eq!(config.defaults.gender, Gender::Male);
        assert_eq!(config.defaults.height, 170.0);
        assert_eq!(config.defaults.weight, 70.0);
        assert_eq!(config.session.downstream, DownstreamPolicy::Invalidate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.defaults.gender = Gender::Female;
        config.defaults.activity = Some("moderate".into());
        config.session.downstream = DownstreamPolicy::KeepStale;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.defaults.gender, Gender::Female);
        assert_eq!(loaded.defaults.activity.as_deref(), Some("moderate"));
        assert_eq!(loaded.session.downstream, DownstreamPolicy::KeepStale);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[defaults]
age = 45
gender = "female"

[session]
downstream = "keep_stale"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.defaults.age, 45);
        assert_eq!(config.defaults.gender, Gender::Female);
        assert_eq!(config.defaults.height, 170.0); // default
        assert_eq!(config.session.downstream, DownstreamPolicy::KeepStale);
    }

    #[test]
    fn test_out_of_range_default_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nweight = 12.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("weight")));
    }

    #[test]
    fn test_unknown_default_selection_rejected() {
        let mut config = Config::default();
        config.defaults.activity = Some("light".into());
        config.defaults.goal = Some("shredded".into());
        assert!(matches!(config.validate(), Err(Error::Config(ref msg)) if msg.contains("not a known goal")));
    }

    #[test]
    fn test_default_goal_requires_activity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ngoal = \"maintenance\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("requires defaults.activity")));

        std::fs::write(
            &path,
            "[defaults]\nactivity = \"sedentary\"\ngoal = \"maintenance\"\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.defaults.goal.as_deref(), Some("maintenance"));
    }

    #[test]
    fn test_malformed_config_is_toml_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[defaults\nage = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }
}
