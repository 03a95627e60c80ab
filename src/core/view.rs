use crate::core::classifier::CategoryRules;
use crate::domain::model::{
    CategoryFilter, CategoryGroup, MenuItem, MenuView, SectionCounts, SectionFilter,
    ALL_CATEGORIES,
};

pub fn filter_by_section<'a>(
    items: &'a [MenuItem],
    section: SectionFilter,
    rules: &CategoryRules,
) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| section.matches(rules.classify_section(&item.category)))
        .collect()
}

/// Distinct categories in first-seen order, prefixed with `"All"`.
pub fn distinct_categories(items: &[&MenuItem]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for item in items {
        if !categories[1..].iter().any(|c| c == &item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

pub fn filter_by_category<'a>(items: &[&'a MenuItem], category: &CategoryFilter) -> Vec<&'a MenuItem> {
    items
        .iter()
        .copied()
        .filter(|item| category.matches(&item.category))
        .collect()
}

pub fn group_by_category(items: &[&MenuItem]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => group.items.push((*item).clone()),
            None => groups.push(CategoryGroup {
                category: item.category.clone(),
                items: vec![(*item).clone()],
            }),
        }
    }
    groups
}

/// Derives the menu view from the full snapshot and the two selectors.
/// Recomputed from scratch on every call; item order follows `items`.
pub fn build_view(
    items: &[MenuItem],
    section: SectionFilter,
    category: &CategoryFilter,
    rules: &CategoryRules,
) -> MenuView {
    let in_section = filter_by_section(items, section, rules);
    let categories = distinct_categories(&in_section);
    let selected = filter_by_category(&in_section, category);

    MenuView {
        categories,
        grouped: group_by_category(&selected),
    }
}

/// Tab counts for the admin table.
pub fn section_counts(items: &[MenuItem], rules: &CategoryRules) -> SectionCounts {
    let drinks = items.iter().filter(|i| rules.is_drink(&i.category)).count();
    SectionCounts {
        all: items.len(),
        drinks,
        food: items.len() - drinks,
    }
}
