//! Container Fixtures

use serde::Deserialize;

use crate::{
    containers::{Container, ContainerCategory, ContainerItem},
    fixtures::pick_lists::LineFixture,
};

/// Wrapper for containers in YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainersFixture {
    /// Containers, in solve order
    pub containers: Vec<ContainerFixture>,
}

/// Container category in YAML
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFixture {
    /// Standard stock
    #[default]
    Standard,

    /// Replenishment stock
    Replenishment,
}

impl From<CategoryFixture> for ContainerCategory {
    fn from(category: CategoryFixture) -> Self {
        match category {
            CategoryFixture::Standard => ContainerCategory::Standard,
            CategoryFixture::Replenishment => ContainerCategory::Replenishment,
        }
    }
}

/// Container fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerFixture {
    /// Licence plate number
    pub lpn: String,

    /// Container category, standard when omitted
    #[serde(default)]
    pub category: CategoryFixture,

    /// Stocked lines
    #[serde(default)]
    pub items: Vec<LineFixture>,
}

impl From<ContainerFixture> for Container {
    fn from(fixture: ContainerFixture) -> Self {
        let items: Vec<ContainerItem> = fixture
            .items
            .into_iter()
            .map(|line| ContainerItem::new(line.id, line.quantity))
            .collect();

        Container::with_category(fixture.lpn, items, fixture.category.into())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn category_defaults_to_standard() -> TestResult {
        let fixture: ContainersFixture = serde_norway::from_str(
            r"
containers:
  - lpn: lpnA
    items:
      - { id: itemA, quantity: 115 }
  - lpn: lpnR
    category: replenishment
    items:
      - { id: itemA, quantity: 40 }
",
        )?;

        let containers: Vec<Container> = fixture.containers.into_iter().map(Into::into).collect();
        let categories: Vec<_> = containers.iter().map(Container::category).collect();

        assert_eq!(
            categories,
            [ContainerCategory::Standard, ContainerCategory::Replenishment]
        );

        Ok(())
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let result: Result<ContainersFixture, _> =
            serde_norway::from_str("containers:\n  - lpn: x\n    category: overflow\n");

        assert!(result.is_err());
    }
}
