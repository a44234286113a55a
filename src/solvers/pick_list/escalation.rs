//! Time budget escalation
//!
//! Attempt `n` gets `n` times the base budget. Every attempt plans against the
//! same untouched inputs, and only a usable plan is ever committed.

use tracing::{debug, info, warn};

use crate::{
    containers::Container,
    pick_lists::PickList,
    solvers::{
        SolveStatus, SolverError,
        engine::SolverEngine,
        pick_list::{PickListSolver, PickListSolverResult},
    },
};

/// Solve with escalating time budgets, stopping at the first usable status.
///
/// When every attempt comes back without a usable assignment the status of the
/// last attempt is returned alongside the unmodified entities.
///
/// # Errors
///
/// Returns a [`SolverError`] as soon as an attempt fails with an error; errors
/// are not retried.
#[tracing::instrument(
    name = "picklist.solver.solve_with_escalation",
    skip_all,
    fields(
        max_attempts = solver.config().escalation.max_attempts,
        base_time_limit_secs = solver.config().time_limit_secs
    ),
    err
)]
pub fn solve_with_escalation<E: SolverEngine>(
    solver: &mut PickListSolver<E>,
    mut pick_lists: Vec<PickList>,
    mut containers: Vec<Container>,
) -> Result<PickListSolverResult, SolverError> {
    solver.config().validate()?;

    let max_attempts = solver.config().escalation.max_attempts;
    let mut status = SolveStatus::NotSolved;

    for attempt in 1..=max_attempts {
        let time_limit = solver.config().attempt_time_limit(attempt);

        debug!(
            attempt,
            time_limit_secs = time_limit.as_secs(),
            "starting solve attempt"
        );

        let plan = solver.plan(&pick_lists, &containers, time_limit)?;

        status = plan.status();

        if status.is_usable() {
            plan.commit(&mut pick_lists, &mut containers)?;

            info!(
                attempt,
                %status,
                allocated = plan.total_quantity(),
                "solved pick lists"
            );

            return Ok(PickListSolverResult {
                status,
                attempts: attempt,
                pick_lists,
                containers,
            });
        }

        debug!(attempt, %status, "attempt produced no usable assignment");
    }

    warn!(
        attempts = max_attempts,
        %status,
        "escalation exhausted without a usable assignment"
    );

    Ok(PickListSolverResult {
        status,
        attempts: max_attempts,
        pick_lists,
        containers,
    })
}
