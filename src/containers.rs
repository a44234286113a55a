//! Containers

/// Category of a supply container.
///
/// Replenishment stock is deprioritised by the objective: the solver only
/// touches it when standard containers cannot cover the demand cheaper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContainerCategory {
    /// Regular pick-face stock
    #[default]
    Standard,

    /// Replenishment (reserve) stock
    Replenishment,
}

impl ContainerCategory {
    /// Whether this is replenishment stock.
    pub fn is_replenishment(self) -> bool {
        matches!(self, ContainerCategory::Replenishment)
    }
}

/// A single commodity line held in a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerItem {
    id: String,
    quantity: u64,
}

impl ContainerItem {
    /// Create a container line for the given commodity and quantity.
    pub fn new(id: impl Into<String>, quantity: u64) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }

    /// Commodity identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Remaining quantity
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Take `quantity` units out of this line.
    ///
    /// Returns `None` (leaving the line untouched) if there is not enough stock.
    pub(crate) fn take(&mut self, quantity: u64) -> Option<u64> {
        self.quantity = self.quantity.checked_sub(quantity)?;

        Some(self.quantity)
    }
}

/// A supply container identified by its licence plate number (LPN).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    lpn: String,
    items: Vec<ContainerItem>,
    category: ContainerCategory,
}

impl Container {
    /// Create a standard container.
    pub fn new(lpn: impl Into<String>, items: impl Into<Vec<ContainerItem>>) -> Self {
        Self::with_category(lpn, items, ContainerCategory::Standard)
    }

    /// Create a replenishment container.
    pub fn replenishment(lpn: impl Into<String>, items: impl Into<Vec<ContainerItem>>) -> Self {
        Self::with_category(lpn, items, ContainerCategory::Replenishment)
    }

    /// Create a container with an explicit category.
    pub fn with_category(
        lpn: impl Into<String>,
        items: impl Into<Vec<ContainerItem>>,
        category: ContainerCategory,
    ) -> Self {
        Self {
            lpn: lpn.into(),
            items: items.into(),
            category,
        }
    }

    /// Licence plate number
    pub fn lpn(&self) -> &str {
        &self.lpn
    }

    /// Container category
    pub fn category(&self) -> ContainerCategory {
        self.category
    }

    /// Lines held in the container, in insertion order.
    pub fn items(&self) -> &[ContainerItem] {
        &self.items
    }

    /// Get a line by its position.
    pub fn get_item(&self, idx: usize) -> Option<&ContainerItem> {
        self.items.get(idx)
    }

    pub(crate) fn get_item_mut(&mut self, idx: usize) -> Option<&mut ContainerItem> {
        self.items.get_mut(idx)
    }

    /// Remaining quantity of a commodity across all lines of this container.
    pub fn quantity_of(&self, id: &str) -> u64 {
        self.items
            .iter()
            .filter(|item| item.id() == id)
            .map(ContainerItem::quantity)
            .sum()
    }

    /// Total units held.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(ContainerItem::quantity).sum()
    }

    /// Whether the container holds no stock at all.
    pub fn is_empty(&self) -> bool {
        self.total_quantity() == 0
    }
}
