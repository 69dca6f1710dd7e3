//! Spending categories and the fixed catalog they are resolved against.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Cosmetic tier shared by categories and achievements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub icon: String,
    pub color: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rarity: Rarity,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
            icon: icon.into(),
            color: color.into(),
        }
    }
}

static DEFAULT_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        Category::new("food", "Food", Rarity::Common, "🍔", "#00D9FF"),
        Category::new("entertainment", "Entertainment", Rarity::Rare, "🎮", "#A855F7"),
        Category::new("shopping", "Shopping", Rarity::Epic, "🛍️", "#FF6B35"),
        Category::new("bills", "Bills", Rarity::Legendary, "💳", "#FFD700"),
        Category::new("transport", "Transport", Rarity::Common, "🚗", "#00D9FF"),
        Category::new("health", "Health", Rarity::Rare, "💊", "#A855F7"),
    ]
});

/// Immutable set of categories a transaction may reference.
///
/// The catalog is never empty: its first entry is the fallback for unknown ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.clone(),
        }
    }
}

impl CategoryCatalog {
    /// Looks up `id`, failing with [`EngineError::InvalidCategory`] when absent.
    pub fn resolve(&self, id: &str) -> EngineResult<&Category> {
        self.get(id)
            .ok_or_else(|| EngineError::InvalidCategory(id.to_string()))
    }

    /// Looks up `id`, falling back to the first catalog entry when absent.
    pub fn resolve_or_fallback(&self, id: &str) -> &Category {
        self.get(id).unwrap_or_else(|| self.fallback())
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn fallback(&self) -> &Category {
        &self.categories[0]
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
