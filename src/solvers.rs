//! Solvers for Pick Lists

use std::fmt;

use thiserror::Error;

use crate::{config::ConfigError, validation::ValidationError};

pub mod engine;
pub mod model;
pub mod pick_list;

/// Outcome reported by a solver engine.
///
/// Only [`SolveStatus::Optimal`] and [`SolveStatus::Feasible`] carry a usable
/// assignment; every other status is a regular result the caller branches on,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Proven optimal assignment
    Optimal,

    /// Valid assignment, optimality not proven (time or gap limit reached)
    Feasible,

    /// The model has no feasible assignment
    Infeasible,

    /// The objective is unbounded
    Unbounded,

    /// The engine failed for some other reason
    Abnormal,

    /// The engine gave up before producing an answer
    NotSolved,
}

impl SolveStatus {
    /// Whether this status carries an assignment that can be committed.
    pub fn is_usable(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::Abnormal => "ABNORMAL",
            SolveStatus::NotSolved => "NOT_SOLVED",
        };

        f.write_str(s)
    }
}

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// Wrapped input validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Wrapped configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine returned a different number of values than the model has variables.
    #[error("engine returned {returned} values for a model with {expected} variables")]
    SolutionSizeMismatch {
        /// Number of variables in the model
        expected: usize,

        /// Number of values returned
        returned: usize,
    },

    /// A plan tried to take more units from a container line than it holds.
    #[error("cannot take {requested} units of {id} from {lpn}: only {available} remaining")]
    InsufficientStock {
        /// Container LPN
        lpn: String,

        /// Commodity identifier
        id: String,

        /// Units the plan wants to take
        requested: u64,

        /// Units remaining on the line
        available: u64,
    },

    /// A plan tried to allocate more to a pick list line than it requested.
    #[error("cannot allocate {allocated} units of {id} against a request for {requested}")]
    OverAllocation {
        /// Commodity identifier
        id: String,

        /// Units requested by the line
        requested: u64,

        /// Units the line would hold after the commit
        allocated: u64,
    },

    /// A plan refers to a pick list, container or line that does not exist.
    #[error("plan does not match the entities it is committed to: {message}")]
    PlanMismatch {
        /// What did not match
        message: &'static str,
    },

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_optimal_and_feasible_are_usable() {
        let usable: Vec<_> = [
            SolveStatus::Optimal,
            SolveStatus::Feasible,
            SolveStatus::Infeasible,
            SolveStatus::Unbounded,
            SolveStatus::Abnormal,
            SolveStatus::NotSolved,
        ]
        .into_iter()
        .filter(|status| status.is_usable())
        .collect();

        assert_eq!(usable, [SolveStatus::Optimal, SolveStatus::Feasible]);
    }

    #[test]
    fn status_displays_as_engine_constant() {
        assert_eq!(SolveStatus::NotSolved.to_string(), "NOT_SOLVED");
        assert_eq!(SolveStatus::Optimal.to_string(), "OPTIMAL");
    }

    #[test]
    fn validation_errors_are_transparent() {
        let err = SolverError::from(ValidationError::DuplicateLpn("lpnA".to_string()));

        assert_eq!(err.to_string(), "duplicate container LPN: lpnA");
    }
}
