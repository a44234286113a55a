//! Pairing
//!
//! Flattened, read-only views over pick list lines and container lines. The
//! flattening order (entity first, then line) fixes the order in which decision
//! variables are created, so repeated solves over the same input produce the
//! same model.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::{
    containers::{Container, ContainerItem},
    pick_lists::{PickList, PickListItem},
};

/// Positions of paired lines sharing a commodity.
pub type PairIndexList = SmallVec<[usize; 8]>;

/// A pick list line together with the pick list it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PairedDemand<'a> {
    /// Position of the pick list in the input slice
    pub pick_list_idx: usize,

    /// Position of the line within the pick list
    pub item_idx: usize,

    /// The pick list
    pub pick_list: &'a PickList,

    /// The line
    pub item: &'a PickListItem,
}

/// A container line together with the container it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PairedSupply<'a> {
    /// Position of the container in the input slice
    pub container_idx: usize,

    /// Position of the line within the container
    pub item_idx: usize,

    /// The container
    pub container: &'a Container,

    /// The line
    pub item: &'a ContainerItem,
}

/// Flattened demand and supply lines for one solve attempt.
#[derive(Debug)]
pub struct Pairing<'a> {
    demand: Vec<PairedDemand<'a>>,
    supply: Vec<PairedSupply<'a>>,
    supply_by_commodity: FxHashMap<&'a str, PairIndexList>,
}

impl<'a> Pairing<'a> {
    /// Flatten the given pick lists and containers.
    pub fn new(pick_lists: &'a [PickList], containers: &'a [Container]) -> Self {
        let demand: Vec<PairedDemand<'a>> = pick_lists
            .iter()
            .enumerate()
            .flat_map(|(pick_list_idx, pick_list)| {
                pick_list
                    .items()
                    .iter()
                    .enumerate()
                    .map(move |(item_idx, item)| PairedDemand {
                        pick_list_idx,
                        item_idx,
                        pick_list,
                        item,
                    })
            })
            .collect();

        let supply: Vec<PairedSupply<'a>> = containers
            .iter()
            .enumerate()
            .flat_map(|(container_idx, container)| {
                container
                    .items()
                    .iter()
                    .enumerate()
                    .map(move |(item_idx, item)| PairedSupply {
                        container_idx,
                        item_idx,
                        container,
                        item,
                    })
            })
            .collect();

        let mut supply_by_commodity: FxHashMap<&'a str, PairIndexList> = FxHashMap::default();

        for (idx, paired) in supply.iter().enumerate() {
            supply_by_commodity
                .entry(paired.item.id())
                .or_default()
                .push(idx);
        }

        Self {
            demand,
            supply,
            supply_by_commodity,
        }
    }

    /// Flattened pick list lines.
    pub fn demand(&self) -> &[PairedDemand<'a>] {
        &self.demand
    }

    /// Flattened container lines.
    pub fn supply(&self) -> &[PairedSupply<'a>] {
        &self.supply
    }

    /// Positions (into [`Pairing::supply`]) of container lines holding `id`, in flattening order.
    pub fn supply_for(&self, id: &str) -> &[usize] {
        self.supply_by_commodity
            .get(id)
            .map_or(&[][..], |indices| indices.as_slice())
    }

    /// Distinct commodities requested by any pick list, in first-seen order.
    pub fn demanded_commodities(&self) -> Vec<&'a str> {
        let mut seen: FxHashSet<&'a str> = FxHashSet::default();

        self.demand
            .iter()
            .map(|paired| paired.item.id())
            .filter(|&id| seen.insert(id))
            .collect()
    }

    /// Quantity of a commodity still to be allocated across all pick lists.
    pub fn outstanding_quantity(&self, id: &str) -> u64 {
        self.demand
            .iter()
            .filter(|paired| paired.item.id() == id)
            .map(|paired| paired.item.unallocated_quantity())
            .sum()
    }

    /// Total available quantity of a commodity across all containers.
    pub fn available_quantity(&self, id: &str) -> u64 {
        self.supply_for(id)
            .iter()
            .filter_map(|&idx| self.supply.get(idx))
            .map(|paired| paired.item.quantity())
            .sum()
    }
}
