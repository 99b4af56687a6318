//! Cuisine keyword table and the category matcher used for exclusions.
//!
//! Category data from the places service is noisy, so a cuisine is
//! recognised by case-insensitive keyword matching against the venue name and
//! its type tags. The table can be replaced by loading a YAML file with the
//! same shape as `config/cuisines.yaml`; any other [`CategoryMatcher`] can be
//! swapped in once the service provides structured categories.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Candidate;
use crate::ConfigError;

/// Place types excluded from every nearby search.
pub const BASELINE_EXCLUDED_TYPES: &[&str] = &[
    "primary_school",
    "secondary_school",
    "movie_theater",
    "shopping_mall",
    "grocery_store",
];

/// Decides whether a candidate belongs to an excluded category.
pub trait CategoryMatcher: Send + Sync {
    /// Returns `true` if `candidate` belongs to `category`.
    fn matches(&self, candidate: &Candidate, category: &str) -> bool;

    /// Structured place type the search service understands for `category`,
    /// if any. Categories without one are only filtered client-side.
    fn place_type(&self, _category: &str) -> Option<&str> {
        None
    }

    /// Returns `true` if `candidate` matches any of `excluded`.
    fn excludes(&self, candidate: &Candidate, excluded: &BTreeSet<String>) -> bool {
        excluded.iter().any(|category| self.matches(candidate, category))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineConfig {
    pub key: String,
    pub label: String,
    pub place_type: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineTable {
    pub cuisines: Vec<CuisineConfig>,
}

const BUILTIN: &[(&str, &str, &[&str])] = &[
    (
        "mexican",
        "Mexican",
        &["mexican", "taco", "taqueria", "burrito", "qdoba", "chipotle"],
    ),
    (
        "chinese",
        "Chinese",
        &["chinese", "peking", "szechuan", "sichuan", "dim sum", "wok"],
    ),
    (
        "italian",
        "Italian",
        &["italian", "pizza", "pasta", "trattoria", "pizzeria"],
    ),
    (
        "japanese",
        "Japanese",
        &["japanese", "sushi", "ramen", "tempura", "tonkatsu"],
    ),
    (
        "indian",
        "Indian",
        &["indian", "curry", "tandoor", "naan", "pakora"],
    ),
    ("thai", "Thai", &["thai", "pad thai"]),
    ("korean", "Korean", &["korean", "bbq", "kimchi"]),
    ("vietnamese", "Vietnamese", &["vietnamese", "pho", "banh mi"]),
    ("spanish", "Spanish", &["spanish", "tapas", "paella"]),
    ("french", "French", &["french", "bistro", "brasserie"]),
    (
        "american",
        "American",
        &["american", "burger", "steakhouse", "bbq", "grille"],
    ),
    (
        "middle_eastern",
        "Middle Eastern",
        &[
            "middle eastern",
            "mediterranean",
            "kebab",
            "hummus",
            "falafel",
        ],
    ),
];

impl CuisineTable {
    /// The twelve cuisines offered by default.
    #[must_use]
    pub fn builtin() -> Self {
        let cuisines = BUILTIN
            .iter()
            .map(|(key, label, keywords)| CuisineConfig {
                key: (*key).to_string(),
                label: (*label).to_string(),
                place_type: Some(format!("{key}_restaurant")),
                keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            })
            .collect();
        Self { cuisines }
    }

    /// Parse and validate a cuisine table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CuisineFileParse`] on malformed YAML or
    /// [`ConfigError::Validation`] if the table is inconsistent.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let table: CuisineTable = serde_yaml::from_str(content)?;
        validate_table(&table)?;
        Ok(table)
    }

    /// Load and validate a cuisine table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CuisineFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CuisineConfig> {
        let key = key.trim().to_lowercase();
        self.cuisines.iter().find(|c| c.key == key)
    }
}

impl Default for CuisineTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryMatcher for CuisineTable {
    fn matches(&self, candidate: &Candidate, category: &str) -> bool {
        let category = category.trim().to_lowercase();
        let fallback;
        let keywords: &[String] = if let Some(cuisine) = self.get(&category) {
            &cuisine.keywords
        } else {
            fallback = [category.replace('_', " ")];
            &fallback
        };

        let name = candidate.name.to_lowercase();
        let tags: Vec<String> = candidate
            .category_tags
            .iter()
            .map(|t| t.to_lowercase().replace('_', " "))
            .collect();

        keywords.iter().any(|keyword| {
            let keyword = keyword.to_lowercase();
            name.contains(&keyword) || tags.iter().any(|t| t.contains(&keyword))
        })
    }

    fn place_type(&self, category: &str) -> Option<&str> {
        self.get(category).and_then(|c| c.place_type.as_deref())
    }
}

fn validate_table(table: &CuisineTable) -> Result<(), ConfigError> {
    let mut seen_keys = HashSet::new();

    for cuisine in &table.cuisines {
        let key = cuisine.key.trim();
        if key.is_empty() {
            return Err(ConfigError::Validation(
                "cuisine key must be non-empty".to_string(),
            ));
        }

        if key != cuisine.key || key.to_lowercase() != key {
            return Err(ConfigError::Validation(format!(
                "cuisine key '{}' must be lowercase without surrounding whitespace",
                cuisine.key
            )));
        }

        if !seen_keys.insert(key.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate cuisine key: '{key}'"
            )));
        }

        if cuisine.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "cuisine '{key}' must have at least one keyword"
            )));
        }
    }

    Ok(())
}
