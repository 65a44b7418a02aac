use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart::ensure_in_stock;
use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Shipped) | (Pending, Cancelled) | (Shipped, Delivered) | (Shipped, Cancelled)
        )
    }

    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_transition(self, next))
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNPAID" => Ok(PaymentStatus::Unpaid),
            "PAID" => Ok(PaymentStatus::Paid),
            "REFUNDED" => Ok(PaymentStatus::Refunded),
            other => Err(DomainError::InvalidInput(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }
}

/// Requested status change for an existing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub next: OrderStatus,
    pub tracking_number: Option<String>,
}

impl StatusChange {
    pub fn to(next: OrderStatus) -> Self {
        Self {
            next,
            tracking_number: None,
        }
    }

    pub fn cancel() -> Self {
        Self::to(OrderStatus::Cancelled)
    }
}

/// Status fields an order ends up with after a change is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub tracking_number: Option<String>,
    pub restores_stock: bool,
}

/// Validates `change` against the order's current state.
///
/// Cancellation flips payment to `Refunded` and requires the caller to put
/// every line's quantity back into stock within the same transaction.
pub fn apply_change(
    status: OrderStatus,
    payment_status: PaymentStatus,
    tracking_number: Option<String>,
    change: StatusChange,
) -> Result<AppliedChange, DomainError> {
    let next = status.transition_to(change.next)?;
    let cancelling = next == OrderStatus::Cancelled;
    Ok(AppliedChange {
        status: next,
        payment_status: if cancelling {
            PaymentStatus::Refunded
        } else {
            payment_status
        },
        tracking_number: change.tracking_number.or(tracking_number),
        restores_stock: cancelling,
    })
}

/// Payment can only be recorded once, on an order that is still live.
pub fn record_payment(status: OrderStatus, payment_status: PaymentStatus) -> Result<PaymentStatus, DomainError> {
    if status == OrderStatus::Cancelled || payment_status != PaymentStatus::Unpaid {
        return Err(DomainError::invalid_transition(payment_status, PaymentStatus::Paid));
    }
    Ok(PaymentStatus::Paid)
}

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// A cart line as seen by checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Current price and stock of a product, read under lock.
#[derive(Debug, Clone)]
pub struct StockLevel {
    pub price: BigDecimal,
    pub stock: i32,
}

#[derive(Debug, Clone)]
pub struct OrderPlan {
    pub total: BigDecimal,
    pub lines: Vec<OrderLineInput>,
}

/// Builds the order lines for a checkout, snapshotting unit prices.
///
/// Fails as a whole if the cart is empty, a product has vanished or any
/// line asks for more than the current stock.
pub fn plan_order(
    items: &[CheckoutItem],
    levels: &HashMap<Uuid, StockLevel>,
) -> Result<OrderPlan, DomainError> {
    if items.is_empty() {
        return Err(DomainError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total = BigDecimal::from(0);
    for item in items {
        let level = levels.get(&item.product_id).ok_or(DomainError::NotFound)?;
        ensure_in_stock(item.product_id, item.quantity, level.stock)?;
        total += &level.price * BigDecimal::from(item.quantity);
        lines.push(OrderLineInput {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: level.price.clone(),
        });
    }

    Ok(OrderPlan { total, lines })
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: BigDecimal,
    pub tracking_number: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}
