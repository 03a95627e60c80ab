//! Category rules shared by the public menu and the admin table.
//!
//! Section classification is a case-insensitive substring match against
//! [`DRINK_KEYWORDS`]. Measured-pour eligibility is a case-sensitive exact
//! match against [`MEASURE_CATEGORIES`] minus [`EXCLUDED_CATEGORIES`]. The two
//! use different comparison rules on purpose and must stay that way.

use crate::domain::model::Section;
use serde::{Deserialize, Serialize};

pub const DRINK_KEYWORDS: [&str; 14] = [
    "drink", "beverage", "juice", "tea", "coffee", "soda", "mocktail", "cocktail", "water",
    "shake", "smoothie", "lassi", "beer", "wine",
];

pub const MEASURE_CATEGORIES: [&str; 7] = [
    "Whiskey", "Vodka", "Gin", "Rum", "Brandy", "Tequila", "Liqueur",
];

pub const EXCLUDED_CATEGORIES: [&str; 8] = [
    "Juice", "Shots", "Beer", "Breezers", "Shakes", "Cocktail", "Mocktail", "Wine",
];

fn section_of<K: AsRef<str>>(keywords: &[K], category: &str) -> Section {
    let lowered = category.to_lowercase();
    if keywords
        .iter()
        .any(|k| !k.as_ref().is_empty() && lowered.contains(k.as_ref()))
    {
        Section::Drink
    } else {
        Section::Food
    }
}

fn measured<I: AsRef<str>, E: AsRef<str>>(include: &[I], exclude: &[E], category: &str) -> bool {
    if exclude.iter().any(|c| c.as_ref() == category) {
        return false;
    }
    include.iter().any(|c| c.as_ref() == category)
}

/// Classifies a category with the built-in keyword list.
pub fn classify_section(category: &str) -> Section {
    section_of(DRINK_KEYWORDS.as_slice(), category)
}

/// Whether a category is sold in 30/60/90/180 ml tiers, using the built-in lists.
pub fn is_measured_pour(category: &str) -> bool {
    measured(
        MEASURE_CATEGORIES.as_slice(),
        EXCLUDED_CATEGORIES.as_slice(),
        category,
    )
}

/// The keyword and category lists, loaded once and passed to every consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub drink_keywords: Vec<String>,
    pub measure_categories: Vec<String>,
    pub excluded_categories: Vec<String>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            drink_keywords: DRINK_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            measure_categories: MEASURE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            excluded_categories: EXCLUDED_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CategoryRules {
    /// Keywords are matched against a lower-cased category, so they are
    /// lower-cased here as well.
    pub fn normalized(mut self) -> Self {
        for keyword in &mut self.drink_keywords {
            *keyword = keyword.trim().to_lowercase();
        }
        self.drink_keywords.retain(|k| !k.is_empty());
        self
    }

    pub fn classify_section(&self, category: &str) -> Section {
        section_of(self.drink_keywords.as_slice(), category)
    }

    pub fn is_drink(&self, category: &str) -> bool {
        self.classify_section(category) == Section::Drink
    }

    /// Exclusion wins over inclusion.
    pub fn is_measured_pour(&self, category: &str) -> bool {
        measured(
            self.measure_categories.as_slice(),
            self.excluded_categories.as_slice(),
            category,
        )
    }

    /// Categories listed as both measured and excluded. These are never
    /// treated as measured pours.
    pub fn overlapping_categories(&self) -> Vec<&str> {
        self.measure_categories
            .iter()
            .filter(|c| self.excluded_categories.contains(*c))
            .map(String::as_str)
            .collect()
    }
}
