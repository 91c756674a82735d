use rust_decimal::Decimal;

use crate::codec::check_field;
use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{CreateMenuItem, MenuItem, UpdateMenuItem};
use crate::stock;

fn check_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(StoreError::InvalidPrice(price));
    }
    Ok(())
}

pub fn get_menu(db: &Database) -> Vec<MenuItem> {
    db.load_menu()
}

/// Menu items that can still be ordered.
pub fn get_in_stock(db: &Database) -> Vec<MenuItem> {
    stock::in_stock_items(&db.load_menu())
}

pub fn get_low_stock(db: &Database) -> Vec<MenuItem> {
    stock::low_stock_items(&db.load_menu(), db.config.low_stock_threshold)
}

pub fn create_menu_item(db: &Database, item: CreateMenuItem) -> Result<MenuItem> {
    check_field("ID", &item.id)?;
    check_field("Name", &item.name)?;
    check_field("Category", &item.category)?;
    check_price(item.price)?;

    let mut menu = db.load_menu();
    if menu.iter().any(|m| m.id == item.id) {
        return Err(StoreError::DuplicateItemId(item.id));
    }

    let created = MenuItem::new(item.id, item.name, item.price, item.category, item.stock);
    menu.push(created.clone());
    db.save_menu(&menu)?;

    tracing::info!(id = %created.id, name = %created.name, "Menu item added");
    Ok(created)
}

/// Replaces name, price, category and stock of an existing item; the id is
/// fixed once created.
pub fn update_menu_item(db: &Database, item: UpdateMenuItem) -> Result<MenuItem> {
    check_field("Name", &item.name)?;
    check_field("Category", &item.category)?;
    check_price(item.price)?;

    let mut menu = db.load_menu();
    let existing = menu
        .iter_mut()
        .find(|m| m.id == item.id)
        .ok_or_else(|| StoreError::MenuItemNotFound(item.id.clone()))?;

    existing.name = item.name;
    existing.price = item.price;
    existing.category = item.category;
    existing.stock = item.stock;
    let updated = existing.clone();
    db.save_menu(&menu)?;

    tracing::info!(id = %updated.id, "Menu item updated");
    Ok(updated)
}

pub fn set_stock(db: &Database, id: &str, stock: u32) -> Result<MenuItem> {
    let mut menu = db.load_menu();
    let existing = menu
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| StoreError::MenuItemNotFound(id.to_string()))?;

    existing.stock = stock;
    let updated = existing.clone();
    db.save_menu(&menu)?;

    tracing::info!(id, stock, "Stock updated");
    Ok(updated)
}

pub fn delete_menu_item(db: &Database, id: &str) -> Result<()> {
    let mut menu = db.load_menu();
    let before = menu.len();
    menu.retain(|m| m.id != id);
    if menu.len() == before {
        return Err(StoreError::MenuItemNotFound(id.to_string()));
    }
    db.save_menu(&menu)?;

    tracing::info!(id, "Menu item deleted");
    Ok(())
}
