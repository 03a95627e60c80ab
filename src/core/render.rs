use crate::core::classifier::CategoryRules;
use crate::core::pricing::{format_price, tier_cells};
use crate::domain::model::{MenuItem, MenuView, Promotion, RestaurantSettings};
use crate::utils::error::{MenuError, Result};
use url::Url;

pub const EMPTY_STATE: &str = "No items found in this category.";
pub const DEFAULT_TITLE: &str = "Menu";
pub const NO_PROMOTIONS: &str = "No promotions yet.";

pub const ADMIN_CSV_HEADER: [&str; 8] = [
    "Name", "Category", "Price", "30ml", "60ml", "90ml", "180ml", "Available",
];

/// Plain-text public menu.
pub fn render_public_menu(
    settings: Option<&RestaurantSettings>,
    view: &MenuView,
    promotions: &[Promotion],
) -> String {
    let title = settings
        .map(|s| s.restaurant_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let mut out = underlined(title, '=');

    let active: Vec<&Promotion> = promotions.iter().filter(|p| p.active).collect();
    if !active.is_empty() {
        out.push('\n');
        for promo in active {
            out.push_str(&format!("* {}", promo.title));
            if let Some(audience) = &promo.audience {
                out.push_str(&format!(" ({})", audience));
            }
            out.push('\n');
            if let Some(description) = &promo.description {
                out.push_str(&format!("  {}\n", description));
            }
        }
    }

    if view.is_empty() {
        out.push_str(&format!("\n{}\n", EMPTY_STATE));
        return out;
    }

    for group in &view.grouped {
        out.push('\n');
        out.push_str(&underlined(&group.category, '-'));
        for item in &group.items {
            out.push_str(&format!("{}  {}\n", item.name, format_price(item.price)));
            if let Some(description) = &item.description {
                out.push_str(&format!("    {}\n", description));
            }
        }
    }
    out
}

fn underlined(heading: &str, rule: char) -> String {
    let line: String = std::iter::repeat(rule).take(heading.chars().count()).collect();
    format!("{}\n{}\n", heading, line)
}

/// Every promotion, active or not, one entry per line with its id so it can
/// be passed to `promo activate` or `promo remove`.
pub fn render_promotion_list(promotions: &[Promotion]) -> String {
    if promotions.is_empty() {
        return format!("{}\n", NO_PROMOTIONS);
    }

    let mut out = String::new();
    for promo in promotions {
        let state = if promo.active { "active" } else { "inactive" };
        out.push_str(&format!("{}\t[{}]\t{}", promo.id, state, promo.title));
        if let Some(audience) = &promo.audience {
            out.push_str(&format!(" ({})", audience));
        }
        out.push('\n');
        if let Some(description) = &promo.description {
            out.push_str(&format!("\t{}\n", description));
        }
    }
    out
}

/// Admin table as CSV. Tier columns show a placeholder unless the category
/// is a measured pour with that tier set.
pub fn render_admin_csv(items: &[MenuItem], rules: &CategoryRules) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ADMIN_CSV_HEADER)?;

    for item in items {
        let mut record = vec![
            item.name.clone(),
            item.category.clone(),
            format_price(item.price),
        ];
        record.extend(tier_cells(item, rules).into_iter().map(|(_, cell)| cell));
        record.push(if item.available { "yes" } else { "no" }.to_string());
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| MenuError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| MenuError::validation(format!("CSV is not UTF-8: {}", e)))
}

/// The public menu address encoded in the table QR code.
pub fn menu_url(origin: &str) -> Result<Url> {
    let base = Url::parse(origin)?;
    Ok(base.join("/menu")?)
}
