use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::MenuError;

fn default_available() -> bool {
    true
}

/// A row of the `menu_items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub price_30ml: Option<f64>,
    #[serde(default)]
    pub price_60ml: Option<f64>,
    #[serde(default)]
    pub price_90ml: Option<f64>,
    #[serde(default)]
    pub price_180ml: Option<f64>,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            image_url: None,
            description: None,
            available: true,
            price_30ml: None,
            price_60ml: None,
            price_90ml: None,
            price_180ml: None,
        }
    }

    pub fn price_for(&self, size: PourSize) -> Option<f64> {
        match size {
            PourSize::Ml30 => self.price_30ml,
            PourSize::Ml60 => self.price_60ml,
            PourSize::Ml90 => self.price_90ml,
            PourSize::Ml180 => self.price_180ml,
        }
    }

    pub fn set_price_for(&mut self, size: PourSize, price: Option<f64>) {
        let slot = match size {
            PourSize::Ml30 => &mut self.price_30ml,
            PourSize::Ml60 => &mut self.price_60ml,
            PourSize::Ml90 => &mut self.price_90ml,
            PourSize::Ml180 => &mut self.price_180ml,
        };
        *slot = price;
    }

    /// Tier prices that are actually set, smallest pour first.
    pub fn price_by_volume(&self) -> Vec<(PourSize, f64)> {
        PourSize::ALL
            .iter()
            .filter_map(|size| self.price_for(*size).map(|p| (*size, p)))
            .collect()
    }
}

/// Payload for inserting or updating a menu item. Mirrors [`MenuItem`] minus `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub available: bool,
    pub price_30ml: Option<f64>,
    pub price_60ml: Option<f64>,
    pub price_90ml: Option<f64>,
    pub price_180ml: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PourSize {
    #[serde(rename = "30ml")]
    Ml30,
    #[serde(rename = "60ml")]
    Ml60,
    #[serde(rename = "90ml")]
    Ml90,
    #[serde(rename = "180ml")]
    Ml180,
}

impl PourSize {
    pub const ALL: [PourSize; 4] = [
        PourSize::Ml30,
        PourSize::Ml60,
        PourSize::Ml90,
        PourSize::Ml180,
    ];

    pub fn millilitres(self) -> u32 {
        match self {
            PourSize::Ml30 => 30,
            PourSize::Ml60 => 60,
            PourSize::Ml90 => 90,
            PourSize::Ml180 => 180,
        }
    }

    pub fn label(self) -> String {
        format!("{} ml", self.millilitres())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Drink,
    Food,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Drink => "drink",
            Section::Food => "food",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The section selector. Accepts both the public (`All`/`DRINKS`/`FOOD`) and
/// admin (`All Items`/`Drinks`/`Food`) tab labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectionFilter {
    #[default]
    All,
    Drinks,
    Food,
}

impl SectionFilter {
    pub fn matches(self, section: Section) -> bool {
        match self {
            SectionFilter::All => true,
            SectionFilter::Drinks => section == Section::Drink,
            SectionFilter::Food => section == Section::Food,
        }
    }
}

impl FromStr for SectionFilter {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all items" => Ok(SectionFilter::All),
            "drinks" | "drink" => Ok(SectionFilter::Drinks),
            "food" => Ok(SectionFilter::Food),
            _ => Err(MenuError::validation(format!(
                "Unknown section '{}', expected All, DRINKS or FOOD",
                s
            ))),
        }
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SectionFilter::All => "All",
            SectionFilter::Drinks => "DRINKS",
            SectionFilter::Food => "FOOD",
        })
    }
}

pub const ALL_CATEGORIES: &str = "All";

/// The category selector. Anything other than `All` is matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(s.to_string())
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::from(s))
    }
}

/// Items of one category in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// Derived, presentation-ready menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    /// Category tab labels, always starting with `"All"`.
    pub categories: Vec<String>,
    pub grouped: Vec<CategoryGroup>,
}

impl MenuView {
    pub fn filtered_count(&self) -> usize {
        self.grouped.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grouped.is_empty()
    }

    pub fn group(&self, category: &str) -> Option<&CategoryGroup> {
        self.grouped.iter().find(|g| g.category == category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SectionCounts {
    pub all: usize,
    pub drinks: usize,
    pub food: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSettings {
    pub id: String,
    pub restaurant_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsUpdate {
    pub restaurant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default = "default_available")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPromotion {
    pub title: String,
    pub description: Option<String>,
    pub audience: Option<String>,
    pub active: bool,
}

/// Row counts reported by the admin status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub menu_items: u64,
    pub settings_rows: u64,
    pub connected: bool,
}

/// Which rows a fetch should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemScope {
    /// Available items only, ordered by name.
    Public,
    /// Every item, ordered by category then name.
    Admin,
}

/// Everything one render needs, fetched once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub restaurant_settings: Option<RestaurantSettings>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
}
