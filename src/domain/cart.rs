use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub stock: i32,
    pub updated_at: DateTime<Utc>,
}

impl CartLineView {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: BigDecimal,
    pub item_count: i64,
}

impl CartView {
    pub fn from_lines(lines: Vec<CartLineView>) -> Self {
        let total = lines
            .iter()
            .map(CartLineView::line_total)
            .fold(BigDecimal::from(0), |acc, t| acc + t);
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();
        Self {
            lines,
            total,
            item_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Rejects quantities the cart can never hold.
pub fn ensure_positive(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::InvalidInput(
            "quantity must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Checks a requested quantity against the product's current stock.
pub fn ensure_in_stock(product_id: Uuid, requested: i32, available: i32) -> Result<(), DomainError> {
    if requested > available {
        return Err(DomainError::OutOfStock {
            product_id,
            requested,
            available,
        });
    }
    Ok(())
}

/// Quantity a line ends up with after adding `added` units to `existing`.
pub fn merged_quantity(existing: Option<i32>, added: i32) -> Result<i32, DomainError> {
    match existing {
        Some(current) => current
            .checked_add(added)
            .ok_or_else(|| DomainError::InvalidInput("quantity too large".into())),
        None => Ok(added),
    }
}
