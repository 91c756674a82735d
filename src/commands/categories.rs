use crate::models::MenuItem;

/// Pseudo-category selecting the whole menu.
pub const ALL_CATEGORIES: &str = "All";

/// `"All"` followed by each distinct category in menu order.
pub fn get_categories(menu: &[MenuItem]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for item in menu {
        if !categories[1..].contains(&item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

pub fn filter_by_category(menu: &[MenuItem], category: &str) -> Vec<MenuItem> {
    menu.iter()
        .filter(|item| category == ALL_CATEGORIES || item.category == category)
        .cloned()
        .collect()
}
