use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cart::CartLineView;
use crate::domain::catalog::ProductView;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderLineView, OrderStatus, OrderView, PaymentStatus};
use crate::schema::{cart_lines, categories, order_lines, orders, products, subcategories, wishlist_items};

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = subcategories)]
pub struct NewSubcategoryRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn into_view(self, subcategory_name: String) -> ProductView {
        ProductView {
            id: self.id,
            subcategory_id: self.subcategory_id,
            subcategory_name,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cart_lines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartLineRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLineRow {
    pub fn into_view(self, product: ProductRow) -> CartLineView {
        CartLineView {
            id: self.id,
            product_id: self.product_id,
            product_name: product.name,
            unit_price: product.price,
            quantity: self.quantity,
            stock: product.stock,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_lines)]
pub struct NewCartLineRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub total_amount: BigDecimal,
    pub tracking_number: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn status(&self) -> Result<OrderStatus, DomainError> {
        self.status
            .parse()
            .map_err(|_| DomainError::Internal(format!("order {} has status '{}'", self.id, self.status)))
    }

    pub fn payment_status(&self) -> Result<PaymentStatus, DomainError> {
        self.payment_status.parse().map_err(|_| {
            DomainError::Internal(format!(
                "order {} has payment status '{}'",
                self.id, self.payment_status
            ))
        })
    }

    pub fn into_view(self, lines: Vec<OrderLineView>) -> Result<OrderView, DomainError> {
        Ok(OrderView {
            status: self.status()?,
            payment_status: self.payment_status()?,
            id: self.id,
            user_id: self.user_id,
            total_amount: self.total_amount,
            tracking_number: self.tracking_number,
            payment_date: self.payment_date,
            created_at: self.created_at,
            lines,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl OrderLineRow {
    pub fn into_view(self, product_name: String) -> OrderLineView {
        OrderLineView {
            id: self.id,
            product_id: self.product_id,
            product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = wishlist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WishlistItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = wishlist_items)]
pub struct NewWishlistItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
}
