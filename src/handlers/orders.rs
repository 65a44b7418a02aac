use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Storefront;
use crate::domain::identity::Caller;
use crate::domain::order::{ListResult, OrderLineView, OrderView};
use crate::errors::AppError;

use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Price captured when the order was placed, as a decimal string.
    pub unit_price: String,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        Self {
            id: l.id,
            product_id: l.product_id,
            product_name: l.product_name,
            quantity: l.quantity,
            unit_price: l.unit_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    /// One of PENDING, SHIPPED, DELIVERED, CANCELLED.
    pub status: String,
    /// One of UNPAID, PAID, REFUNDED.
    pub payment_status: String,
    pub total_amount: String,
    pub tracking_number: Option<String>,
    pub payment_date: Option<String>,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            status: o.status.to_string(),
            payment_status: o.payment_status.to_string(),
            total_amount: o.total_amount.to_string(),
            tracking_number: o.tracking_number,
            payment_date: o.payment_date.map(|d| d.to_rfc3339()),
            created_at: o.created_at.to_rfc3339(),
            lines: o.lines.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ListOrdersResponse {
    pub(crate) fn new(result: ListResult, page: i64, limit: i64) -> Self {
        Self {
            items: result.items.into_iter().map(Into::into).collect(),
            total: result.total,
            page,
            limit,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checks out the caller's cart. Stock for every line is decremented and the
/// cart emptied in one transaction; if any line is short nothing changes.
#[utoipa::path(
    post,
    path = "/orders",
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 401, description = "Missing user identity"),
        (status = 409, description = "A line exceeds available stock"),
        (status = 422, description = "Cart is empty"),
        (status = 503, description = "Transaction aborted, retry"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    store: web::Data<Storefront>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let order = blocking(move || store.orders.place_order(caller.user_id)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
///
/// Returns one of the caller's orders together with its lines.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || store.orders.get_order(order_id, caller.user_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// The caller's order history, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Order history", body = [OrderResponse]),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    store: web::Data<Storefront>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let orders = blocking(move || store.orders.list_orders(caller.user_id)).await?;
    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /orders/{id}/cancel
///
/// Cancels a pending or shipped order, returning its units to stock.
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order can no longer be cancelled"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || store.orders.cancel_order(order_id, caller.user_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
