use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StoreError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl User {
    pub fn new(role: Role, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub stock: u32,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            stock,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Takes `quantity` units out of stock. An underflow is rejected and
    /// leaves the count untouched.
    pub fn decrease_stock(&mut self, quantity: u32) -> Result<()> {
        match self.stock.checked_sub(quantity) {
            Some(remaining) => {
                self.stock = remaining;
                Ok(())
            }
            None => Err(StoreError::InsufficientStock(vec![Shortfall {
                item_id: self.id.clone(),
                item_name: self.name.clone(),
                ordered: quantity,
                available: self.stock,
            }])),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub stock: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateMenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub stock: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    // Case-insensitive, as reports compare statuses.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn new(
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_name: item_name.into(),
            quantity,
            unit_price,
        }
    }

    /// Snapshot of a menu item's name and price at the moment it is added.
    pub fn from_menu_item(item: &MenuItem, quantity: u32) -> Self {
        Self::new(item.id.clone(), item.name.clone(), quantity, item.price)
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Order {
    pub order_id: String,
    pub customer_name: String,
    pub table_number: u32,
    pub staff_name: String,
    /// Not written to the orders file; a reloaded order carries its load time.
    pub created_at: DateTime<Local>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        customer_name: impl Into<String>,
        table_number: u32,
        staff_name: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_name: customer_name.into(),
            table_number,
            staff_name: staff_name.into(),
            created_at: Local::now(),
            status: OrderStatus::Pending,
            items: Vec::new(),
        }
    }

    /// Adds a line, folding it into an existing row with the same item id.
    pub fn add_item(&mut self, item: OrderItem) {
        match self.items.iter_mut().find(|i| i.item_id == item.item_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    pub fn remove_item(&mut self, item_id: &str) -> Option<OrderItem> {
        let pos = self.items.iter().position(|i| i.item_id == item_id)?;
        Some(self.items.remove(pos))
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// A requested quantity that the menu cannot cover.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub item_id: String,
    pub item_name: String,
    pub ordered: u32,
    pub available: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ItemSales {
    pub item_name: String,
    pub quantity: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub month: u32,
    pub year: i32,
    pub total_revenue: Decimal,
    pub monthly_income: Decimal,
    pub top_selling_item: String,
    pub order_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessedOrder {
    pub order: Order,
    pub receipt: String,
}
