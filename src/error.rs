//! Error types for loading recipe data and planning production.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::SolveStatus;

/// Errors raised while reading recipe tables or capacity settings.
///
/// Rows that merely fail the rate grammar are not errors; they are reported
/// in [`crate::models::LoadReport::skipped`].
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid item pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid capacity `{0}`, expected NAME=RATE with a non-negative rate")]
    InvalidCapacity(String),
}

/// Errors that end a planning attempt for a target.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("no machine plan satisfies every constraint for {target}")]
    Infeasible { target: String },
    #[error("production of {target} is unbounded; add raw material capacities or minimize machines instead")]
    Unbounded { target: String },
    #[error("the solver did not solve the model for {target}")]
    NotSolved { target: String },
    #[error("{what} must be a finite non-negative rate, got {value}")]
    InvalidRate { what: String, value: f64 },
}

impl PlanError {
    /// Builds the error matching a non-optimal solver status.
    ///
    /// Returns `None` for [`SolveStatus::Optimal`].
    pub fn from_status(status: SolveStatus, target: &str) -> Option<Self> {
        let target = target.to_string();
        match status {
            SolveStatus::Optimal => None,
            SolveStatus::Infeasible => Some(PlanError::Infeasible { target }),
            SolveStatus::Unbounded => Some(PlanError::Unbounded { target }),
            SolveStatus::NotSolved => Some(PlanError::NotSolved { target }),
        }
    }

    /// The solver status behind this error, if it came from the solver.
    pub fn status(&self) -> Option<SolveStatus> {
        match self {
            PlanError::Infeasible { .. } => Some(SolveStatus::Infeasible),
            PlanError::Unbounded { .. } => Some(SolveStatus::Unbounded),
            PlanError::NotSolved { .. } => Some(SolveStatus::NotSolved),
            PlanError::InvalidRate { .. } => None,
        }
    }
}
