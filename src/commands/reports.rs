//! Revenue and sales rollups over the order collection. Pure functions;
//! callers load the orders first.

use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::db::Database;
use crate::models::{ItemSales, Order, OrderStatus, ReportSummary};

pub const NO_TOP_ITEM: &str = "N/A";

pub fn total(order: &Order) -> Decimal {
    order.total()
}

pub fn discount_amount(subtotal: Decimal, discount_percent: Decimal) -> Decimal {
    subtotal * discount_percent / Decimal::ONE_HUNDRED
}

pub fn discounted_total(total: Decimal, discount_percent: Decimal) -> Decimal {
    total - discount_amount(total, discount_percent)
}

/// Sum over every order, whatever its status.
pub fn total_revenue(orders: &[Order]) -> Decimal {
    orders.iter().map(Order::total).sum()
}

/// `month` is 1-based.
pub fn monthly_income(orders: &[Order], month: u32, year: i32) -> Decimal {
    orders
        .iter()
        .filter(|o| o.created_at.month() == month && o.created_at.year() == year)
        .map(Order::total)
        .sum()
}

/// Quantity sold per item name, in first-seen order.
fn quantities_by_name<'a>(orders: impl Iterator<Item = &'a Order>) -> Vec<ItemSales> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sales: Vec<ItemSales> = Vec::new();

    for order in orders {
        for item in &order.items {
            match index.get(item.item_name.as_str()) {
                Some(&i) => sales[i].quantity += u64::from(item.quantity),
                None => {
                    index.insert(item.item_name.as_str(), sales.len());
                    sales.push(ItemSales {
                        item_name: item.item_name.clone(),
                        quantity: u64::from(item.quantity),
                    });
                }
            }
        }
    }
    sales
}

/// Best seller among completed orders. Ties go to the item seen first.
pub fn top_selling_item(orders: &[Order]) -> String {
    let completed = orders.iter().filter(|o| o.status == OrderStatus::Completed);

    let mut best: Option<ItemSales> = None;
    for entry in quantities_by_name(completed) {
        if best.as_ref().map_or(true, |b| entry.quantity > b.quantity) {
            best = Some(entry);
        }
    }
    best.map(|b| b.item_name)
        .unwrap_or_else(|| NO_TOP_ITEM.to_string())
}

/// Every item with its sold quantity, highest first. Counts all statuses.
pub fn sales_ranking(orders: &[Order]) -> Vec<ItemSales> {
    let mut ranking = quantities_by_name(orders.iter());
    ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranking
}

pub fn orders_for_staff<'a>(orders: &'a [Order], staff_name: &str) -> Vec<&'a Order> {
    orders.iter().filter(|o| o.staff_name == staff_name).collect()
}

pub fn summarize(orders: &[Order], month: u32, year: i32) -> ReportSummary {
    ReportSummary {
        month,
        year,
        total_revenue: total_revenue(orders),
        monthly_income: monthly_income(orders, month, year),
        top_selling_item: top_selling_item(orders),
        order_count: orders.len(),
    }
}

pub fn get_report(db: &Database, month: u32, year: i32) -> ReportSummary {
    let orders = db.load_orders();
    summarize(&orders, month, year)
}
