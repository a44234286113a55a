//! Capacity and conservation constraints

use tracing::debug;

use crate::{
    pairing::Pairing,
    solvers::{SolverError, model::MipModel, pick_list::variables::DecisionVariables},
    validation::quantity_to_f64,
};

/// Never allocate more to a pick list line than it still needs.
///
/// Allocations committed by earlier solves count against the request.
///
/// # Errors
///
/// Returns a [`SolverError`] if a quantity cannot be represented as a solver coefficient.
pub fn add_demand_constraints(
    model: &mut MipModel,
    pairing: &Pairing<'_>,
    vars: &DecisionVariables,
) -> Result<(), SolverError> {
    for (demand_idx, demand) in pairing.demand().iter().enumerate() {
        let remaining = demand.item.unallocated_quantity();
        let constraint = model.add_constraint(0.0, quantity_to_f64(remaining)?);

        for var in vars.for_demand(demand_idx) {
            model.set_coefficient(constraint, var.var, 1.0);
        }
    }

    Ok(())
}

/// Never take more from a container line than it holds.
///
/// # Errors
///
/// Returns a [`SolverError`] if a quantity cannot be represented as a solver coefficient.
pub fn add_supply_constraints(
    model: &mut MipModel,
    pairing: &Pairing<'_>,
    vars: &DecisionVariables,
) -> Result<(), SolverError> {
    for (supply_idx, supply) in pairing.supply().iter().enumerate() {
        let constraint = model.add_constraint(0.0, quantity_to_f64(supply.item.quantity())?);

        for var in vars.for_supply(supply_idx) {
            model.set_coefficient(constraint, var.var, 1.0);
        }
    }

    Ok(())
}

/// Force each requested commodity to be allocated as far as stock allows.
///
/// Without this the cheapest answer is to allocate nothing at all: the objective
/// only counts containers. The lower bound is `min(available, outstanding)`, so a
/// commodity nobody stocks gets a bound of zero rather than an infeasible model.
///
/// # Errors
///
/// Returns a [`SolverError`] if a total cannot be represented as a solver coefficient.
pub fn add_inventory_constraints(
    model: &mut MipModel,
    pairing: &Pairing<'_>,
    vars: &DecisionVariables,
) -> Result<(), SolverError> {
    for commodity in pairing.demanded_commodities() {
        let outstanding = pairing.outstanding_quantity(commodity);
        let available = pairing.available_quantity(commodity);
        let required = outstanding.min(available);

        if available == 0 {
            debug!(commodity, outstanding, "no stock for requested commodity");
        }

        let constraint = model.add_constraint(quantity_to_f64(required)?, f64::INFINITY);

        for &supply_idx in pairing.supply_for(commodity) {
            for var in vars.for_supply(supply_idx) {
                model.set_coefficient(constraint, var.var, 1.0);
            }
        }
    }

    Ok(())
}
