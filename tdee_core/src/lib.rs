#![forbid(unsafe_code)]

//! Core domain model for the BMR / TDEE calculator.
//!
//! This crate provides:
//! - Domain types (profile, macro ratio, stages)
//! - Activity and goal factor tables
//! - BMR, TDEE and goal calculations
//! - The stage-gated session flow
//! - Output formatting, configuration and logging

pub mod types;
pub mod error;
pub mod tables;
pub mod calc;
pub mod session;
pub mod report;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use calc::{calculate_bmr, calculate_tdee, determine_goals};
pub use config::Config;
pub use session::{Command, Session, SessionSummary};
pub use report::format_kcal;
