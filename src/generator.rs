//! Test data generator
//!
//! Produces synthetic pick lists and containers for benchmarks and property
//! tests. Every draw goes through the caller's [`Rng`], so a seeded generator
//! always yields the same data.
//!
//! ```
//! use picklist::generator::{GeneratorOptions, TestDataGenerator};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! # fn main() -> Result<(), picklist::generator::GeneratorError> {
//! let mut rng = StdRng::seed_from_u64(42);
//! let generator = TestDataGenerator::new(GeneratorOptions::default(), &mut rng)?;
//! let data = generator.generate(&mut rng);
//!
//! assert_eq!(data.pick_lists.len(), 5);
//! assert_eq!(data.containers.len(), 20);
//! # Ok(())
//! # }
//! ```

use rand::{Rng, distributions::Distribution, seq::SliceRandom};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    containers::{Container, ContainerCategory, ContainerItem},
    generator::kumaraswamy::KumaraswamyRange,
    pick_lists::{PickList, PickListItem},
};

pub mod kumaraswamy;

const ADJECTIVES: [&str; 10] = [
    "large",
    "small",
    "oblong",
    "bulbous",
    "smelly",
    "horrible",
    "nondescript",
    "flagrant",
    "circular",
    "incredible",
];

const COLOURS: [&str; 10] = [
    "pink",
    "blue",
    "red",
    "transparent",
    "golden",
    "white",
    "black",
    "green",
    "coral",
    "orange",
];

const THINGS: [&str; 10] = [
    "shelf", "bracket", "box", "peg", "sprocket", "bucket", "plaque", "cart", "sign", "tub",
];

/// Number of distinct commodity names the generator can produce.
pub const VOCABULARY_SIZE: usize = ADJECTIVES.len() * COLOURS.len() * THINGS.len();

/// Generator errors
#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    /// An option is out of range.
    #[error("Invalid generator option {name}: {reason}")]
    InvalidOption {
        /// Option name
        name: &'static str,

        /// Why it was rejected
        reason: String,
    },

    /// Distribution shape parameters must be positive and finite.
    #[error("Invalid distribution shape: a = {a}, b = {b}")]
    InvalidShape {
        /// Shape parameter `a`
        a: f64,

        /// Shape parameter `b`
        b: f64,
    },

    /// Scaled range is empty or too wide.
    #[error("Invalid distribution range: [{min}, {max}]")]
    InvalidRange {
        /// Lower end
        min: u64,

        /// Upper end
        max: u64,
    },
}

/// Shape of the generated data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Number of pick lists
    pub num_pick_lists: usize,

    /// Most lines on a single pick list
    pub max_items_per_pick_list: u64,

    /// Largest requested quantity on a pick list line
    pub max_pick_list_item_quantity: u64,

    /// Number of containers
    pub num_containers: usize,

    /// Most lines in a single container
    pub max_items_per_container: u64,

    /// Largest stocked quantity on a container line
    pub max_container_item_quantity: u64,

    /// Size of the commodity pool both sides draw from
    pub total_item_types: usize,

    /// Probability that a container is replenishment stock
    pub replenishment_fraction: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            num_pick_lists: 5,
            max_items_per_pick_list: 6,
            max_pick_list_item_quantity: 200,
            num_containers: 20,
            max_items_per_container: 12,
            max_container_item_quantity: 500,
            total_item_types: 50,
            replenishment_fraction: 0.0,
        }
    }
}

impl GeneratorOptions {
    /// Check the options for values the generator cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidOption`] describing the first problem found.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        for (name, value) in [
            ("max_items_per_pick_list", self.max_items_per_pick_list),
            ("max_pick_list_item_quantity", self.max_pick_list_item_quantity),
            ("max_items_per_container", self.max_items_per_container),
            ("max_container_item_quantity", self.max_container_item_quantity),
        ] {
            if value == 0 {
                return Err(GeneratorError::InvalidOption {
                    name,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        if !(1..=VOCABULARY_SIZE).contains(&self.total_item_types) {
            return Err(GeneratorError::InvalidOption {
                name: "total_item_types",
                reason: format!("must be between 1 and {VOCABULARY_SIZE}"),
            });
        }

        if !(0.0..=1.0).contains(&self.replenishment_fraction) {
            return Err(GeneratorError::InvalidOption {
                name: "replenishment_fraction",
                reason: format!("must be within [0, 1], got {}", self.replenishment_fraction),
            });
        }

        Ok(())
    }
}

/// Generated pick lists and containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedData {
    /// Pick lists named `pickList_{i}`
    pub pick_lists: Vec<PickList>,

    /// Containers named `container_{i}`
    pub containers: Vec<Container>,
}

/// Seeded synthetic data generator
#[derive(Debug, Clone)]
pub struct TestDataGenerator {
    options: GeneratorOptions,
    commodities: Vec<String>,
    pick_list_item_count: KumaraswamyRange,
    pick_list_quantity: KumaraswamyRange,
    container_item_count: KumaraswamyRange,
    container_quantity: KumaraswamyRange,
}

impl TestDataGenerator {
    /// Validate `options` and draw the commodity pool from the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] if the options are invalid.
    pub fn new<R: Rng + ?Sized>(
        options: GeneratorOptions,
        rng: &mut R,
    ) -> Result<Self, GeneratorError> {
        options.validate()?;

        let commodities = vocabulary()
            .choose_multiple(rng, options.total_item_types)
            .cloned()
            .collect();

        Ok(Self {
            pick_list_item_count: KumaraswamyRange::new(1, options.max_items_per_pick_list)?,
            pick_list_quantity: KumaraswamyRange::new(1, options.max_pick_list_item_quantity)?,
            container_item_count: KumaraswamyRange::new(1, options.max_items_per_container)?,
            container_quantity: KumaraswamyRange::new(1, options.max_container_item_quantity)?,
            commodities,
            options,
        })
    }

    /// Generator options
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Commodity pool, in draw order.
    pub fn commodities(&self) -> &[String] {
        &self.commodities
    }

    /// Generate pick lists, then containers.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedData {
        GeneratedData {
            pick_lists: self.generate_pick_lists(rng),
            containers: self.generate_containers(rng),
        }
    }

    fn generate_pick_lists<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PickList> {
        (0..self.options.num_pick_lists)
            .map(|i| {
                let items: Vec<PickListItem> = self
                    .draw_commodities(rng, &self.pick_list_item_count)
                    .into_iter()
                    .map(|id| PickListItem::new(id, self.pick_list_quantity.sample(rng)))
                    .collect();

                PickList::new(format!("pickList_{i}"), items)
            })
            .collect()
    }

    fn generate_containers<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Container> {
        (0..self.options.num_containers)
            .map(|i| {
                let items: Vec<ContainerItem> = self
                    .draw_commodities(rng, &self.container_item_count)
                    .into_iter()
                    .map(|id| ContainerItem::new(id, self.container_quantity.sample(rng)))
                    .collect();

                let category = if rng.gen_bool(self.options.replenishment_fraction) {
                    ContainerCategory::Replenishment
                } else {
                    ContainerCategory::Standard
                };

                Container::with_category(format!("container_{i}"), items, category)
            })
            .collect()
    }

    /// Distinct commodities for one pick list or container.
    fn draw_commodities<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: &KumaraswamyRange,
    ) -> Vec<String> {
        let n = usize::try_from(count.sample(rng)).unwrap_or(usize::MAX);

        self.commodities.choose_multiple(rng, n).cloned().collect()
    }
}

/// Every commodity name the generator knows, `{adjective} {colour} {thing}`.
pub fn vocabulary() -> Vec<String> {
    let mut words = Vec::with_capacity(VOCABULARY_SIZE);

    for adjective in ADJECTIVES {
        for colour in COLOURS {
            for thing in THINGS {
                words.push(format!("{adjective} {colour} {thing}"));
            }
        }
    }

    words
}
