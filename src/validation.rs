//! Input validation
//!
//! Structural checks that run before any model is built. Anything rejected here
//! would either make the model ambiguous (duplicate identifiers) or silently
//! change it (quantities the solver cannot represent).

use num_traits::ToPrimitive;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{containers::Container, pick_lists::PickList};

/// Structural input errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Two containers share a licence plate number.
    #[error("duplicate container LPN: {0}")]
    DuplicateLpn(String),

    /// Two pick lists share an identifier.
    #[error("duplicate pick list id: {0}")]
    DuplicatePickList(String),

    /// A commodity appears on more than one line of a container.
    #[error("commodity {id} appears more than once in container {lpn}")]
    DuplicateContainerItem {
        /// Container LPN
        lpn: String,

        /// Commodity identifier
        id: String,
    },

    /// A commodity appears on more than one line of a pick list.
    #[error("commodity {id} appears more than once on pick list {pick_list}")]
    DuplicatePickListItem {
        /// Pick list identifier
        pick_list: String,

        /// Commodity identifier
        id: String,
    },

    /// Quantity cannot be represented exactly as a solver coefficient.
    #[error("quantity cannot be represented exactly as a solver coefficient: {quantity}")]
    QuantityNotRepresentable {
        /// Offending quantity
        quantity: u64,
    },

    /// The usage link constant does not dominate a container's maximum flow.
    #[error("big-M {big_m} does not exceed maximum weighted flow {max_flow} of container {lpn}")]
    BigMTooSmall {
        /// Container LPN
        lpn: String,

        /// Weighted sum of variable upper bounds for the container
        max_flow: f64,

        /// Configured big-M
        big_m: f64,
    },
}

/// Validate pick lists: unique identifiers, one line per commodity, representable quantities.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_pick_lists(pick_lists: &[PickList]) -> Result<(), ValidationError> {
    let mut ids = FxHashSet::default();

    for pick_list in pick_lists {
        if !ids.insert(pick_list.id()) {
            return Err(ValidationError::DuplicatePickList(pick_list.id().to_string()));
        }

        let mut commodities = FxHashSet::default();

        for item in pick_list.items() {
            if !commodities.insert(item.id()) {
                return Err(ValidationError::DuplicatePickListItem {
                    pick_list: pick_list.id().to_string(),
                    id: item.id().to_string(),
                });
            }

            quantity_to_f64(item.quantity())?;
        }
    }

    Ok(())
}

/// Validate containers: unique LPNs, one line per commodity, representable quantities.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_containers(containers: &[Container]) -> Result<(), ValidationError> {
    let mut lpns = FxHashSet::default();

    for container in containers {
        if !lpns.insert(container.lpn()) {
            return Err(ValidationError::DuplicateLpn(container.lpn().to_string()));
        }

        let mut commodities = FxHashSet::default();

        for item in container.items() {
            if !commodities.insert(item.id()) {
                return Err(ValidationError::DuplicateContainerItem {
                    lpn: container.lpn().to_string(),
                    id: item.id().to_string(),
                });
            }

            quantity_to_f64(item.quantity())?;
        }
    }

    Ok(())
}

/// Convert a quantity into a solver coefficient.
///
/// # Errors
///
/// Returns [`ValidationError::QuantityNotRepresentable`] if the conversion would lose precision.
pub fn quantity_to_f64(quantity: u64) -> Result<f64, ValidationError> {
    u64_to_f64_exact(quantity).ok_or(ValidationError::QuantityNotRepresentable { quantity })
}

/// Convert `v` to `f64` only if the conversion is exact.
///
/// `good_lp` stores bounds and coefficients as `f64`, which holds every integer
/// up to 2^53 exactly. Larger values would silently round.
pub fn u64_to_f64_exact(v: u64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_u64() == Some(v)).then_some(f)
}

#[cfg(test)]
mod tests {
    use crate::{containers::ContainerItem, pick_lists::PickListItem};

    use super::*;

    #[test]
    fn accepts_well_formed_input() {
        let pick_lists = [
            PickList::new("a", [PickListItem::new("x", 1), PickListItem::new("y", 2)]),
            PickList::new("b", [PickListItem::new("x", 3)]),
        ];
        let containers = [
            Container::new("lpnA", [ContainerItem::new("x", 4)]),
            Container::new("lpnB", [ContainerItem::new("x", 4)]),
        ];

        assert_eq!(validate_pick_lists(&pick_lists), Ok(()));
        assert_eq!(validate_containers(&containers), Ok(()));
    }

    #[test]
    fn rejects_duplicate_lpn() {
        let containers = [
            Container::new("lpnA", Vec::<ContainerItem>::new()),
            Container::new("lpnA", Vec::<ContainerItem>::new()),
        ];

        assert_eq!(
            validate_containers(&containers),
            Err(ValidationError::DuplicateLpn("lpnA".to_string()))
        );
    }

    #[test]
    fn rejects_duplicate_pick_list_id() {
        let pick_lists = [
            PickList::new("a", Vec::<PickListItem>::new()),
            PickList::new("a", Vec::<PickListItem>::new()),
        ];

        assert_eq!(
            validate_pick_lists(&pick_lists),
            Err(ValidationError::DuplicatePickList("a".to_string()))
        );
    }

    #[test]
    fn rejects_repeated_commodity_within_a_container() {
        let containers = [Container::new(
            "lpnA",
            [ContainerItem::new("x", 1), ContainerItem::new("x", 2)],
        )];

        assert_eq!(
            validate_containers(&containers),
            Err(ValidationError::DuplicateContainerItem {
                lpn: "lpnA".to_string(),
                id: "x".to_string(),
            })
        );
    }

    #[test]
    fn rejects_repeated_commodity_within_a_pick_list() {
        let pick_lists = [PickList::new(
            "a",
            [PickListItem::new("x", 1), PickListItem::new("x", 2)],
        )];

        assert_eq!(
            validate_pick_lists(&pick_lists),
            Err(ValidationError::DuplicatePickListItem {
                pick_list: "a".to_string(),
                id: "x".to_string(),
            })
        );
    }

    #[test]
    fn rejects_unrepresentable_quantity() {
        let quantity = 9_007_199_254_740_993; // 2^53 + 1
        let pick_lists = [PickList::new("a", [PickListItem::new("x", quantity)])];

        assert_eq!(
            validate_pick_lists(&pick_lists),
            Err(ValidationError::QuantityNotRepresentable { quantity })
        );
    }

    #[test]
    #[expect(
        clippy::cast_precision_loss,
        reason = "This is a test case for exact conversion"
    )]
    fn u64_to_f64_exact_accepts_exactly_representable_integers() {
        let cases: [u64; 4] = [0, 1, 123, 9_007_199_254_740_992]; // 2^53

        for v in cases {
            assert_eq!(u64_to_f64_exact(v), Some(v as f64));
        }
    }

    #[test]
    fn u64_to_f64_exact_rejects_nonrepresentable_integers() {
        assert_eq!(u64_to_f64_exact(9_007_199_254_740_993), None);
        assert_eq!(u64_to_f64_exact(u64::MAX), None);
    }
}
