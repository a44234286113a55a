//! Integration tests for the pick list solver

use testresult::TestResult;

use picklist::{
    config::SolverConfig,
    containers::{Container, ContainerItem},
    fixtures::Fixture,
    pick_lists::{PickList, PickListItem},
    solvers::{SolveStatus, SolverError, pick_list::PickListSolver},
    validation::ValidationError,
};

fn allocated_from(pick_lists: &[PickList], id: &str, lpn: &str) -> u64 {
    pick_lists
        .iter()
        .flat_map(PickList::items)
        .filter(|item| item.id() == id)
        .flat_map(PickListItem::allocations)
        .filter(|allocation| allocation.lpn == lpn)
        .map(|allocation| allocation.quantity)
        .sum()
}

fn allocated_total(pick_lists: &[PickList], id: &str) -> u64 {
    pick_lists
        .iter()
        .flat_map(PickList::items)
        .filter(|item| item.id() == id)
        .map(PickListItem::allocated_quantity)
        .sum()
}

#[test]
fn basic_fixture_allocates_as_expected() -> TestResult {
    let (pick_lists, containers) = Fixture::from_set("basic")?.into_parts();

    let result = PickListSolver::default().solve_with_escalation(pick_lists, containers)?;

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.attempts, 1);

    // itemA only lives in lpnA
    assert_eq!(allocated_from(&result.pick_lists, "itemA", "lpnA"), 15);

    // itemB is short: 25 requested, 5 stocked
    assert_eq!(allocated_from(&result.pick_lists, "itemB", "lpnA"), 5);

    // lpnC alone covers itemC, so lpnB is never opened
    assert_eq!(allocated_from(&result.pick_lists, "itemC", "lpnC"), 30);
    assert_eq!(allocated_from(&result.pick_lists, "itemC", "lpnB"), 0);
    assert_eq!(result.used_lpns(), ["lpnA", "lpnC"]);

    let lpn_a = result
        .containers
        .iter()
        .find(|c| c.lpn() == "lpnA")
        .ok_or("missing lpnA")?;
    assert_eq!(lpn_a.quantity_of("itemA"), 100);
    assert_eq!(lpn_a.quantity_of("itemB"), 0);

    let lpn_b = result
        .containers
        .iter()
        .find(|c| c.lpn() == "lpnB")
        .ok_or("missing lpnB")?;
    assert_eq!(lpn_b.quantity_of("itemC"), 9);

    Ok(())
}

#[test]
fn unstocked_commodity_leaves_line_empty() -> TestResult {
    let pick_lists = vec![PickList::new(
        "pickListA",
        [PickListItem::new("itemA", 4), PickListItem::new("itemZ", 9)],
    )];
    let containers = vec![Container::new("lpnA", [ContainerItem::new("itemA", 10)])];

    let result = PickListSolver::default().solve(pick_lists, containers)?;

    assert!(result.status.is_usable());

    let pick_list = result.pick_lists.first().ok_or("missing pick list")?;
    let item_z = pick_list.get_item(1).ok_or("missing itemZ line")?;

    assert!(item_z.allocations().is_empty());
    assert!(!pick_list.is_fulfilled());
    assert_eq!(allocated_total(&result.pick_lists, "itemA"), 4);

    Ok(())
}

#[test]
fn shared_stock_is_split_without_overdrawing() -> TestResult {
    let pick_lists = vec![
        PickList::new("p1", [PickListItem::new("itemA", 8)]),
        PickList::new("p2", [PickListItem::new("itemA", 8)]),
    ];
    let containers = vec![Container::new("lpnA", [ContainerItem::new("itemA", 10)])];

    let result = PickListSolver::default().solve(pick_lists, containers)?;

    assert!(result.status.is_usable());
    assert_eq!(allocated_total(&result.pick_lists, "itemA"), 10);

    for item in result.pick_lists.iter().flat_map(PickList::items) {
        assert!(item.allocated_quantity() <= item.quantity());
    }

    let lpn_a = result.containers.first().ok_or("missing lpnA")?;
    assert_eq!(lpn_a.quantity_of("itemA"), 0);

    Ok(())
}

#[test]
fn single_container_is_preferred_over_a_split() -> TestResult {
    let pick_lists = vec![PickList::new("p", [PickListItem::new("itemA", 20)])];
    let containers = vec![
        Container::new("small1", [ContainerItem::new("itemA", 10)]),
        Container::new("small2", [ContainerItem::new("itemA", 10)]),
        Container::new("big", [ContainerItem::new("itemA", 40)]),
    ];

    let result = PickListSolver::default().solve(pick_lists, containers)?;

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.used_lpns(), ["big"]);

    Ok(())
}

#[test]
fn replenishment_fixture_solves() -> TestResult {
    let (pick_lists, containers) = Fixture::from_set("replenishment")?.into_parts();

    let result = PickListSolver::default().solve(pick_lists, containers)?;

    assert!(result.status.is_usable());

    // itemA needs both containers: 50 requested, 30 + 40 stocked.
    assert_eq!(allocated_total(&result.pick_lists, "itemA"), 50);
    assert_eq!(allocated_total(&result.pick_lists, "itemD"), 20);

    let mut used = result.used_lpns();
    used.sort_unstable();
    assert_eq!(used, ["lpnA", "reserve1"]);

    Ok(())
}

#[test]
fn replenishment_weight_does_not_outweigh_container_count() -> TestResult {
    // The weight scales flow inside the usage link only; every opened
    // container still costs one, so a single reserve beats two standard ones.
    let pick_lists = vec![PickList::new("p", [PickListItem::new("itemA", 20)])];
    let containers = vec![
        Container::new("lpnA", [ContainerItem::new("itemA", 10)]),
        Container::new("lpnB", [ContainerItem::new("itemA", 10)]),
        Container::replenishment("reserve1", [ContainerItem::new("itemA", 20)]),
    ];

    let result = PickListSolver::default().solve(pick_lists, containers)?;

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.used_lpns(), ["reserve1"]);
    assert_eq!(allocated_from(&result.pick_lists, "itemA", "reserve1"), 20);

    Ok(())
}

#[test]
fn resolving_a_partly_filled_result_tops_up_remaining_lines() -> TestResult {
    let (pick_lists, containers) = Fixture::from_set("basic")?.into_parts();
    let mut solver = PickListSolver::default();

    let first = solver.solve(pick_lists, containers)?;
    assert_eq!(allocated_total(&first.pick_lists, "itemB"), 5);

    // Same pick lists, fresh stock.
    let (_, restocked) = Fixture::from_set("basic")?.into_parts();
    let second = solver.solve(first.pick_lists, restocked)?;

    assert_eq!(second.status, SolveStatus::Optimal);

    // Fulfilled lines take nothing more; itemB gets the restocked 5.
    assert_eq!(allocated_total(&second.pick_lists, "itemA"), 15);
    assert_eq!(allocated_total(&second.pick_lists, "itemB"), 10);
    assert_eq!(allocated_total(&second.pick_lists, "itemC"), 30);

    for item in second.pick_lists.iter().flat_map(PickList::items) {
        assert!(item.allocated_quantity() <= item.quantity(), "{} overfilled", item.id());
    }

    let lpn_a = second
        .containers
        .iter()
        .find(|c| c.lpn() == "lpnA")
        .ok_or("missing lpnA")?;
    assert_eq!(lpn_a.quantity_of("itemA"), 115);
    assert_eq!(lpn_a.quantity_of("itemB"), 0);

    Ok(())
}

#[test]
fn duplicate_pick_lists_are_rejected_before_solving() {
    let pick_lists = vec![
        PickList::new("p", [PickListItem::new("itemA", 1)]),
        PickList::new("p", [PickListItem::new("itemB", 1)]),
    ];
    let containers = vec![Container::new("lpnA", [ContainerItem::new("itemA", 1)])];

    let result = PickListSolver::default().solve(pick_lists, containers);

    assert!(matches!(
        result,
        Err(SolverError::Validation(ValidationError::DuplicatePickList(id))) if id == "p"
    ));
}

#[test]
fn undersized_big_m_is_rejected() {
    let pick_lists = vec![PickList::new("p", [PickListItem::new("itemA", 100)])];
    let containers = vec![Container::new("lpnA", [ContainerItem::new("itemA", 100)])];

    let config = SolverConfig::default().with_big_m(50.0);
    let result = PickListSolver::new(config).solve(pick_lists, containers);

    assert!(matches!(
        result,
        Err(SolverError::Validation(ValidationError::BigMTooSmall { .. }))
    ));
}

#[test]
fn config_loaded_from_yaml_drives_solver() -> TestResult {
    let config =
        SolverConfig::from_yaml_str("time_limit_secs: 3\nescalation:\n  max_attempts: 2\n")?;
    let (pick_lists, containers) = Fixture::from_set("basic")?.into_parts();

    let mut solver = PickListSolver::new(config);
    let result = solver.solve_with_escalation(pick_lists, containers)?;

    assert_eq!(solver.config().escalation.max_attempts, 2);
    assert_eq!(result.status, SolveStatus::Optimal);

    Ok(())
}
