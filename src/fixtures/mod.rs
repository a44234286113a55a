//! Fixtures
//!
//! Named sets of pick lists and containers stored as YAML under
//! `{base}/pick_lists/{name}.yml` and `{base}/containers/{name}.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    containers::Container,
    fixtures::{containers::ContainersFixture, pick_lists::PickListsFixture},
    pick_lists::PickList,
    validation::{ValidationError, validate_containers, validate_pick_lists},
};

pub mod containers;
pub mod pick_lists;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Fixture contents fail structural validation
    #[error("Invalid fixture: {0}")]
    Validation(#[from] ValidationError),

    /// Pick list not found
    #[error("Pick list not found: {0}")]
    PickListNotFound(String),

    /// Container not found
    #[error("Container not found: {0}")]
    ContainerNotFound(String),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded pick lists, in file order
    pick_lists: Vec<PickList>,

    /// Loaded containers, in file order
    containers: Vec<Container>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            pick_lists: Vec::new(),
            containers: Vec::new(),
        }
    }

    /// Load pick lists from a YAML fixture file
    ///
    /// Loaded pick lists are appended to any already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the combined
    /// pick lists fail validation.
    pub fn load_pick_lists(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("pick_lists")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PickListsFixture = serde_norway::from_str(&contents)?;

        let mut pick_lists = self.pick_lists.clone();
        pick_lists.extend(fixture.pick_lists.into_iter().map(PickList::from));

        validate_pick_lists(&pick_lists)?;

        self.pick_lists = pick_lists;

        Ok(self)
    }

    /// Load containers from a YAML fixture file
    ///
    /// Loaded containers are appended to any already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the combined
    /// containers fail validation.
    pub fn load_containers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("containers")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: ContainersFixture = serde_norway::from_str(&contents)?;

        let mut containers = self.containers.clone();
        containers.extend(fixture.containers.into_iter().map(Container::from));

        validate_containers(&containers)?;

        self.containers = containers;

        Ok(self)
    }

    /// Load a complete fixture set (pick lists and containers with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_pick_lists(name)?.load_containers(name)?;

        Ok(fixture)
    }

    /// Get a pick list by its identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the pick list is not found.
    pub fn pick_list(&self, id: &str) -> Result<&PickList, FixtureError> {
        self.pick_lists
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| FixtureError::PickListNotFound(id.to_string()))
    }

    /// Get a container by its LPN
    ///
    /// # Errors
    ///
    /// Returns an error if the container is not found.
    pub fn container(&self, lpn: &str) -> Result<&Container, FixtureError> {
        self.containers
            .iter()
            .find(|c| c.lpn() == lpn)
            .ok_or_else(|| FixtureError::ContainerNotFound(lpn.to_string()))
    }

    /// Get all pick lists
    pub fn pick_lists(&self) -> &[PickList] {
        &self.pick_lists
    }

    /// Get all containers
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Take ownership of the loaded pick lists and containers, ready to solve.
    pub fn into_parts(self) -> (Vec<PickList>, Vec<Container>) {
        (self.pick_lists, self.containers)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
