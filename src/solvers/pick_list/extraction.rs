//! Solution extraction
//!
//! Solved values become an [`AllocationPlan`]: immutable allocation records that
//! refer back to the pick lists and containers they were built from. Nothing is
//! written to the entities until the plan is committed.

use num_traits::ToPrimitive;
use rustc_hash::FxHashMap;

use crate::{
    containers::Container,
    pairing::Pairing,
    pick_lists::{Allocation, PickList},
    solvers::{
        SolveStatus, SolverError,
        engine::EngineSolution,
        pick_list::variables::DecisionVariables,
    },
};

/// Units of one commodity to move from a container line to a pick list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAllocation {
    /// Position of the pick list
    pub pick_list_idx: usize,

    /// Position of the line within the pick list
    pub pick_list_item_idx: usize,

    /// Position of the container
    pub container_idx: usize,

    /// Position of the line within the container
    pub container_item_idx: usize,

    /// Source container LPN
    pub lpn: String,

    /// Commodity identifier
    pub id: String,

    /// Units to move
    pub quantity: u64,
}

/// Outcome of one solve attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    status: SolveStatus,
    allocations: Vec<PlannedAllocation>,
}

impl AllocationPlan {
    /// A plan with no allocations.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            allocations: Vec::new(),
        }
    }

    /// Engine status for the attempt
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Planned allocations, in decision variable order.
    pub fn allocations(&self) -> &[PlannedAllocation] {
        &self.allocations
    }

    /// Total units moved by the plan.
    pub fn total_quantity(&self) -> u64 {
        self.allocations.iter().map(|a| a.quantity).sum()
    }

    /// Distinct container LPNs the plan draws from, in first-use order.
    pub fn used_lpns(&self) -> Vec<&str> {
        let mut lpns: Vec<&str> = Vec::new();

        for allocation in &self.allocations {
            if !lpns.contains(&allocation.lpn.as_str()) {
                lpns.push(&allocation.lpn);
            }
        }

        lpns
    }

    /// Write the plan into the entities it was built from.
    ///
    /// Appends an [`Allocation`] to each referenced pick list line and decrements
    /// each referenced container line. The whole plan is checked first, so on
    /// error nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::PlanMismatch`] if the plan refers to entities that do
    /// not exist or do not match, [`SolverError::InsufficientStock`] if a container
    /// line would go negative, or [`SolverError::OverAllocation`] if a pick list
    /// line would receive more than it requested.
    pub fn commit(
        &self,
        pick_lists: &mut [PickList],
        containers: &mut [Container],
    ) -> Result<(), SolverError> {
        self.check(pick_lists, containers)?;

        for planned in &self.allocations {
            let supply = containers
                .get_mut(planned.container_idx)
                .and_then(|c| c.get_item_mut(planned.container_item_idx))
                .ok_or(SolverError::InvariantViolation {
                    message: "checked container line disappeared during commit",
                })?;

            supply.take(planned.quantity).ok_or(SolverError::InvariantViolation {
                message: "checked container line underflowed during commit",
            })?;

            let demand = pick_lists
                .get_mut(planned.pick_list_idx)
                .and_then(|p| p.get_item_mut(planned.pick_list_item_idx))
                .ok_or(SolverError::InvariantViolation {
                    message: "checked pick list line disappeared during commit",
                })?;

            demand.push_allocation(Allocation::new(planned.lpn.clone(), planned.quantity));
        }

        Ok(())
    }

    fn check(&self, pick_lists: &[PickList], containers: &[Container]) -> Result<(), SolverError> {
        let mut taken: FxHashMap<(usize, usize), u64> = FxHashMap::default();
        let mut given: FxHashMap<(usize, usize), u64> = FxHashMap::default();

        for planned in &self.allocations {
            let container = containers
                .get(planned.container_idx)
                .ok_or(SolverError::PlanMismatch {
                    message: "container index out of range",
                })?;

            if container.lpn() != planned.lpn {
                return Err(SolverError::PlanMismatch {
                    message: "container LPN differs from planned LPN",
                });
            }

            let supply = container
                .get_item(planned.container_item_idx)
                .ok_or(SolverError::PlanMismatch {
                    message: "container line index out of range",
                })?;

            let demand = pick_lists
                .get(planned.pick_list_idx)
                .and_then(|p| p.get_item(planned.pick_list_item_idx))
                .ok_or(SolverError::PlanMismatch {
                    message: "pick list line index out of range",
                })?;

            if supply.id() != planned.id || demand.id() != planned.id {
                return Err(SolverError::PlanMismatch {
                    message: "commodity differs from planned commodity",
                });
            }

            let total_taken = taken
                .entry((planned.container_idx, planned.container_item_idx))
                .or_default();
            *total_taken = total_taken.saturating_add(planned.quantity);

            if *total_taken > supply.quantity() {
                return Err(SolverError::InsufficientStock {
                    lpn: planned.lpn.clone(),
                    id: planned.id.clone(),
                    requested: *total_taken,
                    available: supply.quantity(),
                });
            }

            let total_given = given
                .entry((planned.pick_list_idx, planned.pick_list_item_idx))
                .or_insert_with(|| demand.allocated_quantity());
            *total_given = total_given.saturating_add(planned.quantity);

            if *total_given > demand.quantity() {
                return Err(SolverError::OverAllocation {
                    id: planned.id.clone(),
                    requested: demand.quantity(),
                    allocated: *total_given,
                });
            }
        }

        Ok(())
    }
}

/// Read solved values back into an [`AllocationPlan`].
///
/// Values are rounded to the nearest integer and clamped to the variable's upper
/// bound; variables that round to zero produce no allocation. Statuses without a
/// usable assignment produce an empty plan.
///
/// # Errors
///
/// Returns [`SolverError::SolutionSizeMismatch`] if the engine returned the wrong
/// number of values, or [`SolverError::InvariantViolation`] for non-finite values.
pub fn extract_plan(
    pairing: &Pairing<'_>,
    vars: &DecisionVariables,
    variable_count: usize,
    solution: &EngineSolution,
) -> Result<AllocationPlan, SolverError> {
    if !solution.status.is_usable() {
        return Ok(AllocationPlan::empty(solution.status));
    }

    if solution.values.len() != variable_count {
        return Err(SolverError::SolutionSizeMismatch {
            expected: variable_count,
            returned: solution.values.len(),
        });
    }

    let mut allocations = Vec::new();

    for var in vars.iter() {
        let value = solution.value(var.var).ok_or(SolverError::InvariantViolation {
            message: "solution has no value for decision variable",
        })?;

        let quantity = value
            .round()
            .max(0.0)
            .to_u64()
            .ok_or(SolverError::InvariantViolation {
                message: "solution value is not a finite quantity",
            })?
            .min(var.upper_bound);

        if quantity == 0 {
            continue;
        }

        let demand = pairing
            .demand()
            .get(var.demand)
            .ok_or(SolverError::InvariantViolation {
                message: "decision variable refers to a missing pick list line",
            })?;

        let supply = pairing
            .supply()
            .get(var.supply)
            .ok_or(SolverError::InvariantViolation {
                message: "decision variable refers to a missing container line",
            })?;

        allocations.push(PlannedAllocation {
            pick_list_idx: demand.pick_list_idx,
            pick_list_item_idx: demand.item_idx,
            container_idx: supply.container_idx,
            container_item_idx: supply.item_idx,
            lpn: supply.container.lpn().to_string(),
            id: supply.item.id().to_string(),
            quantity,
        });
    }

    Ok(AllocationPlan {
        status: solution.status,
        allocations,
    })
}
