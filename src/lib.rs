//! Picklist
//!
//! Picklist allocates warehouse stock to pick lists. It builds a mixed-integer
//! model over the commodities each pick list requests and each container holds,
//! minimises the number of containers touched, and writes the chosen
//! allocations back onto the pick lists and containers.

pub mod config;
pub mod containers;
pub mod fixtures;
pub mod generator;
pub mod pairing;
pub mod pick_lists;
pub mod prelude;
pub mod solvers;
pub mod validation;
