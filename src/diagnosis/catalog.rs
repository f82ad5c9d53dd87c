//! Externally supplied symptom catalog ("cheat sheet").
//!
//! Loaded once at startup and shared read-only across sessions. A missing or
//! unparsable document yields an empty catalog; a malformed item is skipped
//! on its own without discarding its neighbours.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog has no \"categories\" array")]
    MissingCategories,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub symptom_examples: Vec<String>,
    /// Most likely first.
    #[serde(default)]
    pub potential_problems: Vec<String>,
    #[serde(default)]
    pub common_repairs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomCatalog {
    pub categories: Vec<CatalogCategory>,
}

impl SymptomCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.items.is_empty())
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded symptom catalog from {}: {} categories",
            path.display(),
            catalog.categories.len()
        );
        Ok(catalog)
    }

    /// Load, or degrade to an empty catalog with a warning.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Symptom catalog unavailable ({}): {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    /// Tolerant conversion: categories or items of the wrong shape are dropped
    /// individually.
    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        let raw_categories = value
            .get("categories")
            .and_then(Value::as_array)
            .ok_or(CatalogError::MissingCategories)?;

        let mut categories = Vec::with_capacity(raw_categories.len());
        for raw in raw_categories {
            let Some(name) = raw.get("category").and_then(Value::as_str) else {
                debug!("Skipping catalog category without a name");
                continue;
            };

            let items = raw
                .get("items")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match serde_json::from_value::<CatalogItem>(item.clone()) {
                            Ok(parsed) => Some(parsed),
                            Err(e) => {
                                debug!("Skipping malformed catalog item in '{}': {}", name, e);
                                None
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();

            categories.push(CatalogCategory { category: name.to_string(), items });
        }

        Ok(Self { categories })
    }
}
