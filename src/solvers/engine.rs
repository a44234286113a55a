//! Solver Engines
//!
//! The engine is the only part of a solve that does not belong to this crate:
//! it receives a finished [`MipModel`] and a time budget and reports a status
//! plus one value per model variable.

use std::time::Duration;

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    solvers::SolutionStatus,
    variable::{VariableDefinition, variable},
};
use tracing::{debug, warn};

#[cfg(feature = "solver-highs")]
use good_lp::solvers::WithTimeLimit;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::solvers::{
    SolveStatus, SolverError,
    model::{MipModel, ModelVariable, Sense, VarHandle, VariableKind},
};

/// Status and variable values returned by an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSolution {
    /// Engine status
    pub status: SolveStatus,

    /// One value per model variable, indexed by [`VarHandle::index`].
    ///
    /// Empty when the status is not usable.
    pub values: Vec<f64>,
}

impl EngineSolution {
    /// A solution carrying values.
    pub fn new(status: SolveStatus, values: Vec<f64>) -> Self {
        Self { status, values }
    }

    /// A solution without values.
    pub fn without_values(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }

    /// Solved value of `var`, if any.
    pub fn value(&self, var: VarHandle) -> Option<f64> {
        self.values.get(var.index()).copied()
    }
}

/// Trait for engines that solve a [`MipModel`].
pub trait SolverEngine {
    /// Solve the model within `time_limit`.
    ///
    /// Infeasibility, unboundedness and running out of time are reported through
    /// [`EngineSolution::status`], not as errors.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the model cannot be handed to the engine at all.
    fn solve(&mut self, model: &MipModel, time_limit: Duration)
    -> Result<EngineSolution, SolverError>;
}

/// Engine backed by `good_lp`, using HiGHS or microlp depending on enabled features.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoodLpEngine;

impl SolverEngine for GoodLpEngine {
    fn solve(
        &mut self,
        model: &MipModel,
        time_limit: Duration,
    ) -> Result<EngineSolution, SolverError> {
        // Constraints without terms (e.g. demand for a commodity nobody stocks) are
        // settled here; some backends reject empty rows.
        let trivially_infeasible = model
            .constraints()
            .iter()
            .any(|c| c.terms.is_empty() && (c.lower > 0.0 || c.upper < 0.0));

        if trivially_infeasible {
            return Ok(EngineSolution::without_values(SolveStatus::Infeasible));
        }

        let mut pb = ProblemVariables::new();

        let vars: Vec<Variable> = model
            .variables()
            .iter()
            .map(|var| pb.add(definition(var)))
            .collect();

        let objective = expression(model.objective(), &vars)?;

        let unsolved = match model.sense() {
            Sense::Minimise => pb.minimise(objective),
            Sense::Maximise => pb.maximise(objective),
        };

        let mut problem = unsolved.using(default_solver);

        #[cfg(feature = "solver-highs")]
        {
            problem = problem.with_time_limit(time_limit.as_secs_f64());
        }

        #[cfg(not(feature = "solver-highs"))]
        warn!(
            time_limit_secs = time_limit.as_secs_f64(),
            "backend has no time limit support; budget not enforced"
        );

        for constraint in model.constraints() {
            if constraint.terms.is_empty() {
                continue;
            }

            let lhs = expression(&constraint.terms, &vars)?;

            #[expect(
                clippy::float_cmp,
                reason = "Bounds are copied from integer quantities, equality is exact"
            )]
            let is_equality = constraint.lower == constraint.upper;

            if is_equality {
                problem = problem.with(lhs.eq(constraint.upper));
                continue;
            }

            if constraint.lower.is_finite() {
                problem = problem.with(lhs.clone().geq(constraint.lower));
            }

            if constraint.upper.is_finite() {
                problem = problem.with(lhs.leq(constraint.upper));
            }
        }

        debug!(
            model = model.name(),
            variables = vars.len(),
            constraints = model.constraints().len(),
            "handing model to good_lp"
        );

        match problem.solve() {
            Ok(solution) => {
                let status = match solution.status() {
                    SolutionStatus::Optimal => SolveStatus::Optimal,
                    _ => SolveStatus::Feasible,
                };

                let values = vars.iter().map(|&var| solution.value(var)).collect();

                Ok(EngineSolution::new(status, values))
            }
            Err(ResolutionError::Infeasible) => {
                Ok(EngineSolution::without_values(SolveStatus::Infeasible))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(EngineSolution::without_values(SolveStatus::Unbounded))
            }
            Err(err) => {
                warn!(error = %err, "good_lp failed to resolve model");

                Ok(EngineSolution::without_values(SolveStatus::Abnormal))
            }
        }
    }
}

fn definition(var: &ModelVariable) -> VariableDefinition {
    match var.kind {
        VariableKind::Boolean => variable().binary().name(var.label.clone()),
        VariableKind::Integer => variable()
            .integer()
            .min(var.lower)
            .max(var.upper)
            .name(var.label.clone()),
    }
}

fn expression(terms: &[(VarHandle, f64)], vars: &[Variable]) -> Result<Expression, SolverError> {
    let mut expr = Expression::default();

    for &(handle, coefficient) in terms {
        let var = vars
            .get(handle.index())
            .ok_or(SolverError::InvariantViolation {
                message: "model term refers to an unknown variable",
            })?;

        expr += *var * coefficient;
    }

    Ok(expr)
}
