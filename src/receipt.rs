use chrono::{DateTime, Local};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::commands::reports::discount_amount;
use crate::config::MIN_RECEIPT_WIDTH;
use crate::models::Order;

const QTY_WIDTH: usize = 3;
const PRICE_WIDTH: usize = 8;
const AMOUNT_WIDTH: usize = 10;

pub(crate) fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Fixed-width text receipt for a finalized order.
pub struct ReceiptRenderer<'a> {
    order: &'a Order,
    discount_percent: Decimal,
    title: &'a str,
    width: usize,
}

impl<'a> ReceiptRenderer<'a> {
    /// Widths below the configured minimum are raised to it.
    pub fn new(order: &'a Order, discount_percent: Decimal, title: &'a str, width: usize) -> Self {
        Self {
            order,
            discount_percent,
            title,
            width: width.max(MIN_RECEIPT_WIDTH),
        }
    }

    pub fn render(&self) -> String {
        self.render_at(Local::now())
    }

    /// Renders with `printed_at` as the receipt date; everything else
    /// depends only on the order and discount.
    pub fn render_at(&self, printed_at: DateTime<Local>) -> String {
        let w = self.width;
        let name_width = w - (QTY_WIDTH + PRICE_WIDTH * 2 + 3);
        let mut out = String::new();

        let mut line = |text: &str| {
            out.push_str(text);
            out.push('\n');
        };

        // Header
        line(&"=".repeat(w));
        line(&format!("{:^w$}", self.title));
        line(&"=".repeat(w));
        line("");

        line(&format!("Receipt No: {}", self.order.order_id));
        line(&format!("Date: {}", printed_at.format("%d-%m-%Y %H:%M:%S")));
        line(&format!("Staff: {}", self.order.staff_name));
        line("");
        line(&format!("Customer: {}", self.order.customer_name));
        line(&format!("Table No: {}", self.order.table_number));
        line("");

        // Items
        line("Items:");
        line(&format!(
            "{:<name_width$} {:>QTY_WIDTH$} {:>PRICE_WIDTH$} {:>PRICE_WIDTH$}",
            "Item", "Qty", "Price", "Total"
        ));
        line(&"-".repeat(w));
        for item in &self.order.items {
            let name: String = item.item_name.chars().take(name_width).collect();
            line(&format!(
                "{:<name_width$} {:>QTY_WIDTH$} {:>PRICE_WIDTH$} {:>PRICE_WIDTH$}",
                name,
                item.quantity,
                money(item.unit_price),
                money(item.line_total())
            ));
        }
        line(&"-".repeat(w));

        // Totals
        let subtotal = self.order.total();
        let label_width = w - AMOUNT_WIDTH;
        line(&format!(
            "{:<label_width$}{:>AMOUNT_WIDTH$}",
            "Subtotal:",
            format!("${}", money(subtotal))
        ));
        let mut grand_total = subtotal;
        if self.discount_percent > Decimal::ZERO {
            let discount = discount_amount(subtotal, self.discount_percent);
            grand_total = subtotal - discount;
            line(&format!(
                "{:<label_width$}{:>AMOUNT_WIDTH$}",
                format!("Discount ({}%):", self.discount_percent.normalize()),
                format!("-${}", money(discount))
            ));
        }
        line(&format!(
            "{:<label_width$}{:>AMOUNT_WIDTH$}",
            "Total:",
            format!("${}", money(grand_total))
        ));

        // Footer
        line("");
        line(&"=".repeat(w));
        line(&format!("{:^w$}", "Thank you for visiting!"));
        line(&format!("{:^w$}", "Please come again!"));
        line(&"=".repeat(w));

        out
    }
}
