use crate::core::classifier::CategoryRules;
use crate::domain::model::{MenuItem, NewMenuItem, NewPromotion, PourSize};
use crate::utils::error::{MenuError, Result};
use crate::utils::validation::{non_empty, parse_optional_price, parse_price};
use serde::{Deserialize, Serialize};

pub const CURRENCY_SYMBOL: &str = "₹";
pub const MISSING_PRICE: &str = "—";

pub fn format_price(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

/// One display cell per pour size. Non-measured categories always show the
/// placeholder, even if tier prices are stored.
pub fn tier_cells(item: &MenuItem, rules: &CategoryRules) -> Vec<(PourSize, String)> {
    let measured = rules.is_measured_pour(&item.category);
    PourSize::ALL
        .iter()
        .map(|size| {
            let cell = match item.price_for(*size) {
                Some(price) if measured => format_price(price),
                _ => MISSING_PRICE.to_string(),
            };
            (*size, cell)
        })
        .collect()
}

/// Raw admin form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
    pub description: String,
    pub available: bool,
    pub price_30ml: String,
    pub price_60ml: String,
    pub price_90ml: String,
    pub price_180ml: String,
}

impl MenuItemDraft {
    /// Pre-fills the form from an existing row.
    pub fn from_item(item: &MenuItem) -> Self {
        let tier = |size| item.price_for(size).map(|p| p.to_string()).unwrap_or_default();
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price.to_string(),
            image_url: item.image_url.clone().unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
            available: item.available,
            price_30ml: tier(PourSize::Ml30),
            price_60ml: tier(PourSize::Ml60),
            price_90ml: tier(PourSize::Ml90),
            price_180ml: tier(PourSize::Ml180),
        }
    }

    pub fn tier_input(&self, size: PourSize) -> &str {
        match size {
            PourSize::Ml30 => &self.price_30ml,
            PourSize::Ml60 => &self.price_60ml,
            PourSize::Ml90 => &self.price_90ml,
            PourSize::Ml180 => &self.price_180ml,
        }
    }

    /// Validates the form. Tier prices only survive for measured-pour
    /// categories.
    pub fn into_new_item(self, rules: &CategoryRules) -> Result<NewMenuItem> {
        let name = non_empty(&self.name).ok_or_else(|| MenuError::validation("Name is required"))?;
        let category =
            non_empty(&self.category).ok_or_else(|| MenuError::validation("Category is required"))?;
        let price = parse_price("Price", &self.price)?;

        let measured = rules.is_measured_pour(&category);
        let mut tiers = [None; 4];
        for (slot, size) in tiers.iter_mut().zip(PourSize::ALL) {
            let field = format!("{} price", size.label());
            let parsed = parse_optional_price(&field, self.tier_input(size))?;
            if measured {
                *slot = parsed;
            } else if parsed.is_some() {
                tracing::debug!("Dropping {} for non-measured category '{}'", field, category);
            }
        }
        let [price_30ml, price_60ml, price_90ml, price_180ml] = tiers;

        Ok(NewMenuItem {
            name,
            category,
            price,
            image_url: non_empty(&self.image_url),
            description: non_empty(&self.description),
            available: self.available,
            price_30ml,
            price_60ml,
            price_90ml,
            price_180ml,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotionDraft {
    pub title: String,
    pub description: String,
    pub audience: String,
    pub active: bool,
}

impl PromotionDraft {
    pub fn into_new_promotion(self) -> Result<NewPromotion> {
        let title =
            non_empty(&self.title).ok_or_else(|| MenuError::validation("Title is required"))?;
        Ok(NewPromotion {
            title,
            description: non_empty(&self.description),
            audience: non_empty(&self.audience),
            active: self.active,
        })
    }
}
