//! One-line text encodings for the persisted entities.
//!
//! | entity    | line                                                  |
//! |-----------|-------------------------------------------------------|
//! | user      | `ROLE,username,password`                              |
//! | menu item | `id,name,price,category,stock` (legacy: no `stock`)   |
//! | order     | `orderId\|customer\|table\|staff\|status[\|items]`    |
//!
//! Order items are `itemId:itemName:quantity:price`, joined by `;`.
//! Nothing is escaped, so field values must not contain the delimiters;
//! [`check_field`] is the guard callers run before storing user input.

use chrono::Local;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::error::StoreError;
use crate::models::{MenuItem, Order, OrderItem, OrderStatus, Role, User};

/// Characters with structural meaning in at least one encoding.
pub const RESERVED_CHARS: [char; 6] = [',', '|', ':', ';', '\n', '\r'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// A type persisted as one line per record.
pub trait Record: Sized {
    const KIND: &'static str;

    fn encode(&self) -> String;

    fn decode(line: &str) -> Result<Self, CodecError>;
}

/// Rejects empty values and values that would break a record apart.
pub fn check_field(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::MissingField(field));
    }
    if value.contains(RESERVED_CHARS) {
        return Err(StoreError::ReservedCharacter {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn require(parts: &[&str], expected: usize) -> Result<(), CodecError> {
    if parts.len() < expected {
        return Err(CodecError::TooFewFields {
            expected,
            found: parts.len(),
        });
    }
    Ok(())
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, CodecError> {
    value.trim().parse().map_err(|_| CodecError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_positive(field: &'static str, value: &str) -> Result<u32, CodecError> {
    match parse_number::<u32>(field, value)? {
        0 => Err(CodecError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
        n => Ok(n),
    }
}

fn parse_price(field: &'static str, value: &str) -> Result<Decimal, CodecError> {
    let price: Decimal = parse_number(field, value)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CodecError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(price)
}

impl Record for User {
    const KIND: &'static str = "user";

    fn encode(&self) -> String {
        format!("{},{},{}", self.role, self.username, self.password)
    }

    fn decode(line: &str) -> Result<Self, CodecError> {
        let parts: Vec<&str> = line.split(',').collect();
        require(&parts, 3)?;
        let role = Role::from_str(parts[0]).map_err(CodecError::UnknownRole)?;
        Ok(User::new(role, parts[1], parts[2]))
    }
}

impl Record for MenuItem {
    const KIND: &'static str = "menu item";

    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.id, self.name, self.price, self.category, self.stock
        )
    }

    fn decode(line: &str) -> Result<Self, CodecError> {
        let parts: Vec<&str> = line.split(',').collect();
        require(&parts, 4)?;
        let price = parse_price("price", parts[2])?;
        // Four-field lines predate stock tracking.
        let stock = match parts.get(4) {
            Some(raw) => parse_number("stock", raw)?,
            None => 0,
        };
        Ok(MenuItem::new(parts[0], parts[1], price, parts[3], stock))
    }
}

impl Record for OrderItem {
    const KIND: &'static str = "order item";

    fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.item_id, self.item_name, self.quantity, self.unit_price
        )
    }

    fn decode(segment: &str) -> Result<Self, CodecError> {
        let parts: Vec<&str> = segment.split(':').collect();
        require(&parts, 4)?;
        Ok(OrderItem::new(
            parts[0],
            parts[1],
            parse_positive("quantity", parts[2])?,
            parse_price("unit price", parts[3])?,
        ))
    }
}

impl Record for Order {
    const KIND: &'static str = "order";

    fn encode(&self) -> String {
        let mut line = format!(
            "{}|{}|{}|{}|{}",
            self.order_id, self.customer_name, self.table_number, self.staff_name, self.status
        );
        if !self.items.is_empty() {
            let items: Vec<String> = self.items.iter().map(OrderItem::encode).collect();
            line.push('|');
            line.push_str(&items.join(";"));
        }
        line
    }

    /// Decodes an order line. Creation time is not part of the line and is
    /// set to the moment of decoding. Unreadable item segments are dropped
    /// and the rest of the order kept.
    fn decode(line: &str) -> Result<Self, CodecError> {
        let parts: Vec<&str> = line.split('|').collect();
        require(&parts, 5)?;

        let status = OrderStatus::from_str(parts[4]).map_err(CodecError::UnknownStatus)?;
        let mut order = Order {
            order_id: parts[0].to_string(),
            customer_name: parts[1].to_string(),
            table_number: parse_positive("table number", parts[2])?,
            staff_name: parts[3].to_string(),
            created_at: Local::now(),
            status,
            items: Vec::new(),
        };

        if let Some(block) = parts.get(5) {
            for segment in block.split(';').filter(|s| !s.trim().is_empty()) {
                match OrderItem::decode(segment) {
                    Ok(item) => order.add_item(item),
                    Err(e) => tracing::warn!(
                        order_id = %order.order_id,
                        segment,
                        error = %e,
                        "Skipping malformed order item"
                    ),
                }
            }
        }
        Ok(order)
    }
}

/// Decodes every line of `content`, dropping blank and malformed lines.
pub fn decode_lines<T: Record>(content: &str) -> Vec<T> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match T::decode(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(kind = T::KIND, line = idx + 1, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

/// Encodes records one per line, each terminated by a newline.
pub fn encode_lines<T: Record>(records: &[T]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.encode());
        out.push('\n');
    }
    out
}
