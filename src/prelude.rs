//! Picklist prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    config::{ConfigError, ContainerWeights, EscalationConfig, SolverConfig},
    containers::{Container, ContainerCategory, ContainerItem},
    fixtures::{Fixture, FixtureError},
    generator::{GeneratedData, GeneratorError, GeneratorOptions, TestDataGenerator},
    pick_lists::{Allocation, PickList, PickListItem},
    solvers::{
        SolveStatus, SolverError,
        engine::{EngineSolution, GoodLpEngine, SolverEngine},
        model::MipModel,
        pick_list::{
            PickListModel, PickListSolver, PickListSolverResult,
            extraction::{AllocationPlan, PlannedAllocation},
        },
    },
    validation::ValidationError,
};
