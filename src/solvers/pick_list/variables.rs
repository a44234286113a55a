//! Decision variables
//!
//! One integer variable per (pick list line, container line) pair that share a
//! commodity. Pairs with different commodities never get a variable; the
//! variable space is the sparse subset of the full cross product.

use smallvec::SmallVec;

use crate::{
    pairing::{PairIndexList, Pairing},
    solvers::{
        SolverError,
        model::{MipModel, VarHandle},
    },
    validation::quantity_to_f64,
};

/// Units of one commodity moved from one container line to one pick list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionVariable {
    /// Position of the pick list line in [`Pairing::demand`]
    pub demand: usize,

    /// Position of the container line in [`Pairing::supply`]
    pub supply: usize,

    /// Model variable
    pub var: VarHandle,

    /// Upper bound: `min(still unallocated, available)`
    pub upper_bound: u64,
}

/// The populated entries of the sparse variable space, with back-references.
#[derive(Debug, Clone, Default)]
pub struct DecisionVariables {
    entries: Vec<DecisionVariable>,
    by_demand: Vec<PairIndexList>,
    by_supply: Vec<PairIndexList>,
}

impl DecisionVariables {
    /// Create a variable for every matching pair and register it with `model`.
    ///
    /// Pairs are enumerated demand-major, then in supply flattening order.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if a bound cannot be represented as a solver coefficient.
    pub fn build(pairing: &Pairing<'_>, model: &mut MipModel) -> Result<Self, SolverError> {
        let mut entries = Vec::new();
        let mut by_demand: Vec<PairIndexList> = vec![SmallVec::new(); pairing.demand().len()];
        let mut by_supply: Vec<PairIndexList> = vec![SmallVec::new(); pairing.supply().len()];

        for (demand_idx, demand) in pairing.demand().iter().enumerate() {
            for &supply_idx in pairing.supply_for(demand.item.id()) {
                let supply = pairing
                    .supply()
                    .get(supply_idx)
                    .ok_or(SolverError::InvariantViolation {
                        message: "commodity index refers to a missing container line",
                    })?;

                let upper_bound = demand
                    .item
                    .unallocated_quantity()
                    .min(supply.item.quantity());

                let label = format!(
                    "qty_{}_{}_{}_{}",
                    demand.pick_list.id(),
                    demand.item.id(),
                    supply.container.lpn(),
                    supply.item.id()
                );

                let var = model.add_integer_variable(0.0, quantity_to_f64(upper_bound)?, label);

                let entry_idx = entries.len();

                entries.push(DecisionVariable {
                    demand: demand_idx,
                    supply: supply_idx,
                    var,
                    upper_bound,
                });

                by_demand
                    .get_mut(demand_idx)
                    .ok_or(SolverError::InvariantViolation {
                        message: "demand index out of range while building variables",
                    })?
                    .push(entry_idx);

                by_supply
                    .get_mut(supply_idx)
                    .ok_or(SolverError::InvariantViolation {
                        message: "supply index out of range while building variables",
                    })?
                    .push(entry_idx);
            }
        }

        Ok(Self {
            entries,
            by_demand,
            by_supply,
        })
    }

    /// All decision variables, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &DecisionVariable> {
        self.entries.iter()
    }

    /// Number of decision variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pair matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a decision variable by position.
    pub fn get(&self, idx: usize) -> Option<&DecisionVariable> {
        self.entries.get(idx)
    }

    /// Variables drawing into the pick list line at `demand`.
    pub fn for_demand(&self, demand: usize) -> impl Iterator<Item = &DecisionVariable> {
        self.resolve(self.by_demand.get(demand))
    }

    /// Variables drawing from the container line at `supply`.
    pub fn for_supply(&self, supply: usize) -> impl Iterator<Item = &DecisionVariable> {
        self.resolve(self.by_supply.get(supply))
    }

    fn resolve<'s>(
        &'s self,
        indices: Option<&'s PairIndexList>,
    ) -> impl Iterator<Item = &'s DecisionVariable> {
        indices
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.entries.get(idx))
    }
}
