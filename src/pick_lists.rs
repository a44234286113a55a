//! Pick Lists

use smallvec::SmallVec;

/// Allocation of units from a container to a pick list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Licence plate number of the source container
    pub lpn: String,

    /// Units picked from the container
    pub quantity: u64,
}

impl Allocation {
    /// Create a new allocation.
    pub fn new(lpn: impl Into<String>, quantity: u64) -> Self {
        Self {
            lpn: lpn.into(),
            quantity,
        }
    }
}

/// A requested commodity line on a pick list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickListItem {
    id: String,
    quantity: u64,
    allocations: SmallVec<[Allocation; 2]>,
}

impl PickListItem {
    /// Create a request for `quantity` units of commodity `id`.
    pub fn new(id: impl Into<String>, quantity: u64) -> Self {
        Self {
            id: id.into(),
            quantity,
            allocations: SmallVec::new(),
        }
    }

    /// Commodity identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Requested quantity
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Allocations committed against this line.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Total units allocated so far.
    pub fn allocated_quantity(&self) -> u64 {
        self.allocations.iter().map(|a| a.quantity).sum()
    }

    /// Units still outstanding.
    pub fn unallocated_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.allocated_quantity())
    }

    /// Whether the requested quantity has been fully allocated.
    pub fn is_fulfilled(&self) -> bool {
        self.unallocated_quantity() == 0
    }

    pub(crate) fn push_allocation(&mut self, allocation: Allocation) {
        self.allocations.push(allocation);
    }
}

/// A pick list: an ordered set of commodity requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickList {
    id: String,
    items: Vec<PickListItem>,
}

impl PickList {
    /// Create a pick list.
    pub fn new(id: impl Into<String>, items: impl Into<Vec<PickListItem>>) -> Self {
        Self {
            id: id.into(),
            items: items.into(),
        }
    }

    /// Pick list identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Requested lines, in insertion order.
    pub fn items(&self) -> &[PickListItem] {
        &self.items
    }

    /// Get a line by its position.
    pub fn get_item(&self, idx: usize) -> Option<&PickListItem> {
        self.items.get(idx)
    }

    pub(crate) fn get_item_mut(&mut self, idx: usize) -> Option<&mut PickListItem> {
        self.items.get_mut(idx)
    }

    /// Whether every line has been fully allocated.
    pub fn is_fulfilled(&self) -> bool {
        self.items.iter().all(PickListItem::is_fulfilled)
    }
}
