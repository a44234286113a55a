//! Pick list allocation solver
//!
//! Builds an integer program that decides how many units of each commodity
//! move from each container line to each pick list line, solves it with a
//! [`SolverEngine`] and turns the answer into an [`AllocationPlan`].
//!
//! ```
//! use picklist::prelude::*;
//!
//! # fn main() -> Result<(), SolverError> {
//! let pick_lists = vec![PickList::new("pickListA", [PickListItem::new("itemA", 10)])];
//! let containers = vec![Container::new("lpnA", [ContainerItem::new("itemA", 115)])];
//!
//! let mut solver = PickListSolver::default();
//! let result = solver.solve_with_escalation(pick_lists, containers)?;
//!
//! assert!(result.status.is_usable());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use num_traits::ToPrimitive;
use tracing::{Span, debug, info};

use crate::{
    config::SolverConfig,
    containers::Container,
    pairing::Pairing,
    pick_lists::{PickList, PickListItem},
    solvers::{
        SolveStatus, SolverError,
        engine::{EngineSolution, GoodLpEngine, SolverEngine},
        model::MipModel,
        pick_list::{
            constraints::{
                add_demand_constraints, add_inventory_constraints, add_supply_constraints,
            },
            extraction::{AllocationPlan, extract_plan},
            objective::{UsageIndicator, add_usage_objective},
            variables::DecisionVariables,
        },
    },
    validation::{validate_containers, validate_pick_lists},
};

pub mod constraints;
pub mod escalation;
pub mod extraction;
pub mod objective;
pub mod variables;

/// A fully built pick list model, ready to hand to an engine.
#[derive(Debug)]
pub struct PickListModel<'a> {
    pairing: Pairing<'a>,
    mip: MipModel,
    variables: DecisionVariables,
    usage: Vec<UsageIndicator>,
}

impl<'a> PickListModel<'a> {
    /// Validate the inputs and build variables, constraints and objective.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the configuration or the entities are invalid.
    pub fn build(
        pick_lists: &'a [PickList],
        containers: &'a [Container],
        config: &SolverConfig,
    ) -> Result<Self, SolverError> {
        config.validate()?;
        validate_pick_lists(pick_lists)?;
        validate_containers(containers)?;

        let pairing = Pairing::new(pick_lists, containers);
        let mut mip = MipModel::new("pick_lists");

        let variables = DecisionVariables::build(&pairing, &mut mip)?;

        add_demand_constraints(&mut mip, &pairing, &variables)?;
        add_supply_constraints(&mut mip, &pairing, &variables)?;
        add_inventory_constraints(&mut mip, &pairing, &variables)?;

        let usage = add_usage_objective(&mut mip, &pairing, &variables, containers, config)?;

        Ok(Self {
            pairing,
            mip,
            variables,
            usage,
        })
    }

    /// Flattened demand and supply views
    pub fn pairing(&self) -> &Pairing<'a> {
        &self.pairing
    }

    /// Engine-neutral model
    pub fn mip(&self) -> &MipModel {
        &self.mip
    }

    /// Allocation decision variables
    pub fn variables(&self) -> &DecisionVariables {
        &self.variables
    }

    /// Container usage indicators, one per container.
    pub fn usage(&self) -> &[UsageIndicator] {
        &self.usage
    }

    /// Read an engine solution back into an [`AllocationPlan`].
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solution does not fit this model.
    pub fn extract(&self, solution: &EngineSolution) -> Result<AllocationPlan, SolverError> {
        extract_plan(
            &self.pairing,
            &self.variables,
            self.mip.variables().len(),
            solution,
        )
    }
}

/// Result of solving pick lists against containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickListSolverResult {
    /// Status of the last attempt made
    pub status: SolveStatus,

    /// Number of attempts made
    pub attempts: u32,

    /// Pick lists, with allocations appended if the solve was committed
    pub pick_lists: Vec<PickList>,

    /// Containers, with stock decremented if the solve was committed
    pub containers: Vec<Container>,
}

impl PickListSolverResult {
    /// Total units requested across all pick lists.
    pub fn requested_quantity(&self) -> u64 {
        self.items().map(PickListItem::quantity).sum()
    }

    /// Total units allocated across all pick lists.
    pub fn allocated_quantity(&self) -> u64 {
        self.items().map(PickListItem::allocated_quantity).sum()
    }

    /// Share of the requested units that were allocated, in `[0, 1]`.
    ///
    /// Zero when nothing was requested.
    pub fn matched_fraction(&self) -> f64 {
        let requested = self.requested_quantity();

        if requested == 0 {
            return 0.0;
        }

        match (self.allocated_quantity().to_f64(), requested.to_f64()) {
            (Some(allocated), Some(requested)) => allocated / requested,
            _ => 0.0,
        }
    }

    /// Distinct LPNs allocated from, in first-use order.
    pub fn used_lpns(&self) -> Vec<&str> {
        let mut lpns: Vec<&str> = Vec::new();

        for allocation in self.items().flat_map(PickListItem::allocations) {
            if !lpns.contains(&allocation.lpn.as_str()) {
                lpns.push(&allocation.lpn);
            }
        }

        lpns
    }

    fn items(&self) -> impl Iterator<Item = &PickListItem> {
        self.pick_lists.iter().flat_map(PickList::items)
    }
}

/// Pick list solver
#[derive(Debug, Clone)]
pub struct PickListSolver<E: SolverEngine = GoodLpEngine> {
    config: SolverConfig,
    engine: E,
}

impl PickListSolver<GoodLpEngine> {
    /// Create a solver backed by [`GoodLpEngine`].
    pub fn new(config: SolverConfig) -> Self {
        Self::with_engine(config, GoodLpEngine)
    }
}

impl Default for PickListSolver<GoodLpEngine> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<E: SolverEngine> PickListSolver<E> {
    /// Create a solver backed by a custom engine.
    pub fn with_engine(config: SolverConfig, engine: E) -> Self {
        Self { config, engine }
    }

    /// Solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Build and solve once, without touching the entities.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the inputs are invalid or the engine output
    /// does not fit the model. An infeasible or unfinished solve is not an error.
    #[tracing::instrument(
        name = "picklist.solver.plan",
        skip(self, pick_lists, containers),
        fields(
            pick_lists = pick_lists.len(),
            containers = containers.len(),
            time_limit_secs = time_limit.as_secs(),
            variables = tracing::field::Empty,
            status = tracing::field::Empty
        ),
        err
    )]
    pub fn plan(
        &mut self,
        pick_lists: &[PickList],
        containers: &[Container],
        time_limit: Duration,
    ) -> Result<AllocationPlan, SolverError> {
        let model = PickListModel::build(pick_lists, containers, &self.config)?;

        let span = Span::current();

        span.record("variables", model.variables().len());

        if model.variables().is_empty() {
            debug!("no commodity is both requested and stocked; skipping engine");

            span.record("status", tracing::field::display(SolveStatus::Optimal));

            return Ok(AllocationPlan::empty(SolveStatus::Optimal));
        }

        debug!(
            variables = model.mip().variables().len(),
            constraints = model.mip().constraints().len(),
            "built pick list model"
        );

        let solution = self.engine.solve(model.mip(), time_limit)?;
        let plan = model.extract(&solution)?;

        span.record("status", tracing::field::display(plan.status()));

        debug!(
            status = %plan.status(),
            allocations = plan.allocations().len(),
            containers_used = plan.used_lpns().len(),
            "extracted allocation plan"
        );

        Ok(plan)
    }

    /// Solve once with the configured time budget and commit the result.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if planning or committing fails.
    pub fn solve(
        &mut self,
        mut pick_lists: Vec<PickList>,
        mut containers: Vec<Container>,
    ) -> Result<PickListSolverResult, SolverError> {
        let plan = self.plan(&pick_lists, &containers, self.config.time_limit())?;

        plan.commit(&mut pick_lists, &mut containers)?;

        info!(status = %plan.status(), allocated = plan.total_quantity(), "solved pick lists");

        Ok(PickListSolverResult {
            status: plan.status(),
            attempts: 1,
            pick_lists,
            containers,
        })
    }

    /// Solve with a growing time budget until an attempt yields a usable assignment.
    ///
    /// See [`escalation::solve_with_escalation`].
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if any attempt fails with an error.
    pub fn solve_with_escalation(
        &mut self,
        pick_lists: Vec<PickList>,
        containers: Vec<Container>,
    ) -> Result<PickListSolverResult, SolverError> {
        escalation::solve_with_escalation(self, pick_lists, containers)
    }
}
