//! POI category table and the free-text matcher that routes a query to it.
//!
//! Matching is first-match-wins over the declared order: categories in table
//! order, filters in category order. There is no scoring.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One `key=value` attribute filter against the POI index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiFilter {
    #[serde(rename = "key")]
    pub attribute_key: String,
    #[serde(rename = "value")]
    pub attribute_value: String,
    /// Human-readable name; also the phrase the matcher looks for.
    #[serde(rename = "name")]
    pub display_name: String,
}

impl PoiFilter {
    fn new(attribute_key: &str, attribute_value: &str, display_name: &str) -> Self {
        Self {
            attribute_key: attribute_key.to_owned(),
            attribute_value: attribute_value.to_owned(),
            display_name: display_name.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiCategory {
    pub key: String,
    pub label: String,
    pub color: String,
    pub filters: Vec<PoiFilter>,
}

impl PoiCategory {
    /// The filter used by quick-search shortcuts.
    #[must_use]
    pub fn primary_filter(&self) -> Option<&PoiFilter> {
        self.filters.first()
    }
}

/// Result of a successful [`Taxonomy::match_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyMatch<'a> {
    pub category: &'a PoiCategory,
    pub filter: &'a PoiFilter,
}

/// The fixed, ordered category table. Not mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<PoiCategory>,
}

impl Taxonomy {
    /// Build a taxonomy from an explicit category list after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the list is empty, a key is
    /// blank or duplicated, a category has no filters, or a filter name is blank.
    pub fn new(categories: Vec<PoiCategory>) -> Result<Self, ConfigError> {
        let taxonomy = Self { categories };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// The table shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let category = |key: &str, label: &str, color: &str, filters: Vec<PoiFilter>| PoiCategory {
            key: key.to_owned(),
            label: label.to_owned(),
            color: color.to_owned(),
            filters,
        };

        Self {
            categories: vec![
                category(
                    "food",
                    "Food & Drink",
                    "#e74c3c",
                    vec![
                        PoiFilter::new("amenity", "restaurant", "Restaurant"),
                        PoiFilter::new("amenity", "fast_food", "Fast Food"),
                        PoiFilter::new("amenity", "cafe", "Cafe"),
                        PoiFilter::new("amenity", "bar", "Bar"),
                    ],
                ),
                category(
                    "health",
                    "Health",
                    "#27ae60",
                    vec![
                        PoiFilter::new("amenity", "hospital", "Hospital"),
                        PoiFilter::new("amenity", "pharmacy", "Pharmacy"),
                        PoiFilter::new("amenity", "clinic", "Clinic"),
                    ],
                ),
                category(
                    "money",
                    "Money",
                    "#f39c12",
                    vec![
                        PoiFilter::new("amenity", "atm", "ATM"),
                        PoiFilter::new("amenity", "bank", "Bank"),
                    ],
                ),
                category(
                    "transport",
                    "Transport",
                    "#2980b9",
                    vec![
                        PoiFilter::new("amenity", "fuel", "Gas Station"),
                        PoiFilter::new("amenity", "parking", "Parking"),
                        PoiFilter::new("highway", "bus_stop", "Bus Stop"),
                    ],
                ),
                category(
                    "lodging",
                    "Lodging",
                    "#8e44ad",
                    vec![
                        PoiFilter::new("tourism", "hotel", "Hotel"),
                        PoiFilter::new("tourism", "guest_house", "Guest House"),
                    ],
                ),
                category(
                    "shopping",
                    "Shopping",
                    "#d35400",
                    vec![
                        PoiFilter::new("shop", "supermarket", "Supermarket"),
                        PoiFilter::new("shop", "mall", "Shopping Mall"),
                    ],
                ),
                category(
                    "food_truck",
                    "Food Trucks",
                    "#c0392b",
                    vec![PoiFilter::new("amenity", "food_truck", "Food Truck")],
                ),
            ],
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[PoiCategory] {
        &self.categories
    }

    /// Look a category up by key, ignoring case.
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&PoiCategory> {
        self.categories
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key.trim()))
    }

    /// Find the first filter whose name occurs in `text`, case-insensitively.
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<TaxonomyMatch<'_>> {
        let haystack = text.to_lowercase();
        self.categories.iter().find_map(|category| {
            category
                .filters
                .iter()
                .find(|f| haystack.contains(&f.display_name.to_lowercase()))
                .map(|filter| TaxonomyMatch { category, filter })
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::Validation(
                "taxonomy must declare at least one category".to_string(),
            ));
        }

        let mut seen_keys = HashSet::new();
        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "category key must be non-empty".to_string(),
                ));
            }
            if !seen_keys.insert(category.key.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate category key: '{}'",
                    category.key
                )));
            }
            if category.filters.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{}' has no filters",
                    category.key
                )));
            }
            if let Some(blank) = category
                .filters
                .iter()
                .find(|f| f.display_name.trim().is_empty())
            {
                return Err(ConfigError::Validation(format!(
                    "category '{}' has a filter ({}={}) with a blank name",
                    category.key, blank.attribute_key, blank.attribute_value
                )));
            }
        }

        Ok(())
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate a replacement category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TaxonomyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let taxonomy: Taxonomy =
        serde_yaml::from_str(&content).map_err(ConfigError::TaxonomyFileParse)?;
    taxonomy.validate()?;

    Ok(taxonomy)
}
