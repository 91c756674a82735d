use crate::models::{OrderStatus, Shortfall};
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by repository and domain operations.
///
/// Validation variants are returned before any state is touched, so the
/// caller can show the message and leave both memory and disk as they were.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} may not contain any of , | : ; or line breaks: {value:?}")]
    ReservedCharacter { field: &'static str, value: String },

    #[error("Item ID already exists: {0}")]
    DuplicateItemId(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Order ID already exists: {0}")]
    DuplicateOrderId(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Table number must be at least 1")]
    InvalidTableNumber,

    #[error("Discount must be between 0 and 100, got {0}")]
    InvalidDiscount(Decimal),

    #[error("Order {0} has no items")]
    EmptyOrder(String),

    #[error("You cannot delete your own account")]
    CannotDeleteSelf,

    #[error("Only administrators may {0}")]
    AdminOnly(&'static str),

    #[error("Cannot move order {order_id} from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Insufficient stock: {}", describe_shortfalls(.0))]
    InsufficientStock(Vec<Shortfall>),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_shortfalls(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .iter()
        .map(|s| {
            format!(
                "{} (Available: {}, Ordered: {})",
                s.item_name, s.available, s.ordered
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
