//! Pick List Fixtures

use serde::Deserialize;

use crate::pick_lists::{PickList, PickListItem};

/// Wrapper for pick lists in YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickListsFixture {
    /// Pick lists, in solve order
    pub pick_lists: Vec<PickListFixture>,
}

/// Pick list fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickListFixture {
    /// Pick list identifier
    pub id: String,

    /// Requested lines
    #[serde(default)]
    pub items: Vec<LineFixture>,
}

/// Commodity line fixture, shared by pick lists and containers
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineFixture {
    /// Commodity identifier
    pub id: String,

    /// Units requested or held
    pub quantity: u64,
}

impl From<PickListFixture> for PickList {
    fn from(fixture: PickListFixture) -> Self {
        let items: Vec<PickListItem> = fixture
            .items
            .into_iter()
            .map(|line| PickListItem::new(line.id, line.quantity))
            .collect();

        PickList::new(fixture.id, items)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pick_list_fixture_converts_in_order() -> TestResult {
        let fixture: PickListsFixture = serde_norway::from_str(
            r"
pick_lists:
  - id: pickListA
    items:
      - { id: itemB, quantity: 25 }
      - { id: itemA, quantity: 10 }
",
        )?;

        let pick_lists: Vec<PickList> = fixture.pick_lists.into_iter().map(Into::into).collect();
        let pick_list = pick_lists.first().ok_or("missing pick list")?;

        let ids: Vec<_> = pick_list.items().iter().map(PickListItem::id).collect();

        assert_eq!(pick_list.id(), "pickListA");
        assert_eq!(ids, ["itemB", "itemA"]);

        Ok(())
    }

    #[test]
    fn negative_quantities_fail_to_parse() {
        let result: Result<PickListsFixture, _> = serde_norway::from_str(
            "pick_lists:\n  - id: p\n    items:\n      - { id: a, quantity: -1 }\n",
        );

        assert!(result.is_err());
    }
}
