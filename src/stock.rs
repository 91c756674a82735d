//! Stock ledger: keeps menu stock in step with finalized orders.
//!
//! Orders are checked as a whole against the menu as it is on disk. If any
//! line cannot be covered the order is rejected and nothing is written;
//! otherwise every line is taken out of stock and the menu is saved once.

use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{MenuItem, Order, OrderItem, Shortfall};

/// Lines of `order` the given menu cannot cover. Items missing from the
/// menu count as zero available.
pub fn find_shortfalls(menu: &[MenuItem], order: &Order) -> Vec<Shortfall> {
    // Summed per item id: hand-built orders may repeat one.
    let mut requested: Vec<(&OrderItem, u32)> = Vec::new();
    for line in &order.items {
        match requested.iter_mut().find(|(l, _)| l.item_id == line.item_id) {
            Some((_, qty)) => *qty = qty.saturating_add(line.quantity),
            None => requested.push((line, line.quantity)),
        }
    }

    requested
        .into_iter()
        .filter_map(|(line, ordered)| {
            let available = menu
                .iter()
                .find(|m| m.id == line.item_id)
                .map(|m| m.stock)
                .unwrap_or(0);
            (ordered > available).then(|| Shortfall {
                item_id: line.item_id.clone(),
                item_name: line.item_name.clone(),
                ordered,
                available,
            })
        })
        .collect()
}

/// Takes every line of `order` out of `menu`, or nothing at all.
pub fn apply_to_menu(menu: &mut [MenuItem], order: &Order) -> Result<()> {
    let shortfalls = find_shortfalls(menu, order);
    if !shortfalls.is_empty() {
        return Err(StoreError::InsufficientStock(shortfalls));
    }

    for line in &order.items {
        if let Some(item) = menu.iter_mut().find(|m| m.id == line.item_id) {
            item.decrease_stock(line.quantity)?;
        }
    }
    Ok(())
}

/// Pre-check used before an order is finalized, against a fresh menu load.
pub fn check_stock(db: &Database, order: &Order) -> Vec<Shortfall> {
    let menu = db.load_menu();
    find_shortfalls(&menu, order)
}

pub fn has_sufficient_stock(db: &Database, order: &Order) -> (bool, Vec<Shortfall>) {
    let shortfalls = check_stock(db, order);
    (shortfalls.is_empty(), shortfalls)
}

/// Reloads the menu, applies `order` to it and persists the result.
pub fn apply_order(db: &Database, order: &Order) -> Result<()> {
    let mut menu = db.load_menu();

    if let Err(e) = apply_to_menu(&mut menu, order) {
        tracing::warn!(order_id = %order.order_id, error = %e, "Order rejected by stock ledger");
        return Err(e);
    }

    db.save_menu(&menu)?;
    tracing::info!(order_id = %order.order_id, lines = order.items.len(), "Stock updated for order");
    Ok(())
}

pub fn in_stock_items(menu: &[MenuItem]) -> Vec<MenuItem> {
    menu.iter().filter(|m| m.is_in_stock()).cloned().collect()
}

/// Items at or below `threshold`, lowest stock first.
pub fn low_stock_items(menu: &[MenuItem], threshold: u32) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = menu
        .iter()
        .filter(|m| m.stock <= threshold)
        .cloned()
        .collect();
    items.sort_by_key(|m| m.stock);
    items
}
