use chrono::{DateTime, Local};
use rand::Rng;
use rust_decimal::Decimal;

use crate::codec::check_field;
use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{MenuItem, Order, OrderItem, OrderStatus, ProcessedOrder, Shortfall};
use crate::receipt::ReceiptRenderer;
use crate::stock;

/// `ORD-YYYYMMDD-NNNNN` with a random five-digit suffix.
pub fn generate_order_id() -> String {
    generate_order_id_at(Local::now())
}

pub fn generate_order_id_at(at: DateTime<Local>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(10000..=99999);
    format!("ORD-{}-{}", at.format("%Y%m%d"), suffix)
}

/// Opens an empty PENDING order for a staff member's cart.
pub fn start_order(staff_name: &str, customer_name: &str, table_number: u32) -> Result<Order> {
    check_field("Staff name", staff_name)?;
    // The customer may be left blank until checkout.
    if !customer_name.is_empty() {
        check_field("Customer name", customer_name)?;
    }
    if table_number < 1 {
        return Err(StoreError::InvalidTableNumber);
    }
    Ok(Order::new(
        generate_order_id(),
        customer_name,
        table_number,
        staff_name,
    ))
}

/// Adds `quantity` of `item` to the cart. The cart total for that item may
/// not exceed the item's current stock.
pub fn add_to_cart(order: &mut Order, item: &MenuItem, quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(StoreError::InvalidQuantity);
    }

    let wanted = order
        .quantity_of(&item.id)
        .checked_add(quantity)
        .ok_or(StoreError::InvalidQuantity)?;
    if wanted > item.stock {
        return Err(StoreError::InsufficientStock(vec![Shortfall {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            ordered: wanted,
            available: item.stock,
        }]));
    }

    order.add_item(OrderItem::from_menu_item(item, quantity));
    Ok(())
}

pub fn get_orders(db: &Database) -> Vec<Order> {
    db.load_orders()
}

pub fn get_order(db: &Database, order_id: &str) -> Result<Order> {
    db.load_orders()
        .into_iter()
        .find(|o| o.order_id == order_id)
        .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))
}

/// Only PENDING orders move, and only to COMPLETED or CANCELLED.
pub fn update_order_status(db: &Database, order_id: &str, status: OrderStatus) -> Result<Order> {
    let mut orders = db.load_orders();
    let order = orders
        .iter_mut()
        .find(|o| o.order_id == order_id)
        .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))?;

    if order.status != OrderStatus::Pending || status == OrderStatus::Pending {
        return Err(StoreError::InvalidTransition {
            order_id: order_id.to_string(),
            from: order.status,
            to: status,
        });
    }

    order.status = status;
    let updated = order.clone();
    db.save_orders(&orders)?;

    tracing::info!(order_id, status = %status, "Order status changed");
    Ok(updated)
}

/// Finalizes a cart: stock is checked and taken, the order is marked
/// COMPLETED, its receipt appended to the receipt log and the order added
/// to the orders file.
pub fn process_order(
    db: &Database,
    order: Order,
    discount_percent: Decimal,
) -> Result<ProcessedOrder> {
    process_order_at(db, order, discount_percent, Local::now())
}

pub fn process_order_at(
    db: &Database,
    mut order: Order,
    discount_percent: Decimal,
    at: DateTime<Local>,
) -> Result<ProcessedOrder> {
    if order.items.is_empty() {
        return Err(StoreError::EmptyOrder(order.order_id));
    }
    if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
        return Err(StoreError::InvalidDiscount(discount_percent));
    }
    if order.status != OrderStatus::Pending {
        return Err(StoreError::InvalidTransition {
            order_id: order.order_id,
            from: order.status,
            to: OrderStatus::Completed,
        });
    }

    let mut orders = db.load_orders();
    if orders.iter().any(|o| o.order_id == order.order_id) {
        return Err(StoreError::DuplicateOrderId(order.order_id));
    }

    // Checks the whole order against the menu on disk before touching it.
    stock::apply_order(db, &order)?;

    order.status = OrderStatus::Completed;
    let receipt = ReceiptRenderer::new(
        &order,
        discount_percent,
        &db.config.cafe_name,
        db.config.receipt_width,
    )
    .render_at(at);
    db.append_receipt(&receipt)?;

    orders.push(order.clone());
    db.save_orders(&orders)?;

    tracing::info!(
        order_id = %order.order_id,
        total = %order.total(),
        discount = %discount_percent,
        "Order processed"
    );
    Ok(ProcessedOrder { order, receipt })
}
