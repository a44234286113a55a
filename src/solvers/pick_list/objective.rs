//! Container usage objective
//!
//! Each container gets a boolean usage indicator `u` with objective coefficient
//! 1, so minimising the objective minimises the number of containers touched.
//! The indicator is tied to the container's flow with a big-M link:
//!
//! ```text
//! 1 - M  <=  sum(w * x) - M * u  <=  0
//! ```
//!
//! The upper side forces `u = 1` as soon as any unit leaves the container; the
//! lower side forces some flow whenever `u = 1`. `w` is the category weight, so
//! replenishment stock needs a larger share of `M` for the same flow.
//!
//! By default each container's link uses its own `M`, one more than the most
//! weighted flow it can carry. The configured `big_m` is then only the ceiling
//! every container must stay under. A link with `M = 10^7` leaves usage values
//! of order `10^-6` in the relaxation, which branch and bound can accept as
//! integral zeros.

use smallvec::SmallVec;

use crate::{
    config::SolverConfig,
    containers::Container,
    pairing::Pairing,
    solvers::{
        SolverError,
        model::{MipModel, VarHandle},
        pick_list::variables::{DecisionVariable, DecisionVariables},
    },
    validation::{ValidationError, quantity_to_f64},
};

/// Usage indicator for one container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageIndicator {
    /// Position of the container in the input slice
    pub container_idx: usize,

    /// Boolean model variable
    pub var: VarHandle,

    /// Category weight applied to the container's flow
    pub weight: f64,

    /// `sum(weight * upper bound)` over the container's decision variables
    pub max_weighted_flow: f64,

    /// `M` used in this container's link row
    pub big_m: f64,
}

/// Add one usage indicator per container, its big-M link and its objective term.
///
/// # Errors
///
/// Returns [`ValidationError::BigMTooSmall`] (wrapped) if some container could
/// push at least `big_m` weighted units, since the link would then cut off
/// feasible allocations.
pub fn add_usage_objective(
    model: &mut MipModel,
    pairing: &Pairing<'_>,
    vars: &DecisionVariables,
    containers: &[Container],
    config: &SolverConfig,
) -> Result<Vec<UsageIndicator>, SolverError> {
    let big_m = config.big_m;

    // Group decision variables by container, preserving creation order.
    let mut by_container: Vec<SmallVec<[&DecisionVariable; 8]>> =
        vec![SmallVec::new(); containers.len()];

    for var in vars.iter() {
        let container_idx = pairing
            .supply()
            .get(var.supply)
            .map(|supply| supply.container_idx)
            .ok_or(SolverError::InvariantViolation {
                message: "decision variable refers to a missing container line",
            })?;

        by_container
            .get_mut(container_idx)
            .ok_or(SolverError::InvariantViolation {
                message: "container index out of range while building usage links",
            })?
            .push(var);
    }

    let mut indicators = Vec::with_capacity(containers.len());

    for (container_idx, (container, container_vars)) in
        containers.iter().zip(&by_container).enumerate()
    {
        let weight = config.weights.weight(container.category());

        let mut max_weighted_flow = 0.0;
        for var in container_vars {
            max_weighted_flow += weight * quantity_to_f64(var.upper_bound)?;
        }

        if max_weighted_flow >= big_m {
            return Err(ValidationError::BigMTooSmall {
                lpn: container.lpn().to_string(),
                max_flow: max_weighted_flow,
                big_m,
            }
            .into());
        }

        let link_m = if config.tighten_big_m {
            max_weighted_flow + 1.0
        } else {
            big_m
        };

        let usage = model.add_boolean_variable(format!("usage_{}", container.lpn()));
        model.set_objective_coefficient(usage, 1.0);

        let link = model.add_constraint(1.0 - link_m, 0.0);
        model.set_coefficient(link, usage, -link_m);

        for var in container_vars {
            model.set_coefficient(link, var.var, weight);
        }

        indicators.push(UsageIndicator {
            container_idx,
            var: usage,
            weight,
            max_weighted_flow,
            big_m: link_m,
        });
    }

    model.set_minimise();

    Ok(indicators)
}
