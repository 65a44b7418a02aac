use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Storefront;
use crate::domain::catalog::ProductDraft;
use crate::domain::identity::Caller;
use crate::domain::order::OrderStatus;
use crate::errors::AppError;

use super::blocking;
use super::catalog::ProductResponse;
use super::orders::{ListOrdersParams, ListOrdersResponse, OrderResponse};

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub subcategory_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub stock: i32,
}

impl TryFrom<CreateProductRequest> for ProductDraft {
    type Error = AppError;

    fn try_from(r: CreateProductRequest) -> Result<Self, Self::Error> {
        let price = BigDecimal::from_str(r.price.trim())
            .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", r.price, e)))?;
        Ok(ProductDraft {
            subcategory_id: r.subcategory_id,
            name: r.name,
            description: r.description,
            price,
            stock: r.stock,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status: PENDING, SHIPPED, DELIVERED or CANCELLED.
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShipRequest {
    pub tracking_number: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /merchant/products
#[utoipa::path(
    post,
    path = "/merchant/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product fields"),
        (status = 403, description = "Caller is not a merchant"),
        (status = 404, description = "Subcategory not found"),
    ),
    tag = "merchant"
)]
pub async fn create_product(
    store: web::Data<Storefront>,
    caller: Caller,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    caller.require_staff()?;
    let draft = ProductDraft::try_from(body.into_inner())?;
    let product = blocking(move || store.catalog.create_product(draft)).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// GET /merchant/orders
///
/// Every order in the shop, newest first. Use `page` (1-based) and `limit`.
#[utoipa::path(
    get,
    path = "/merchant/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 403, description = "Caller is not a merchant"),
    ),
    tag = "merchant"
)]
pub async fn list_all_orders(
    store: web::Data<Storefront>,
    caller: Caller,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    caller.require_staff()?;
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = blocking(move || store.orders.list_all_orders(page, limit)).await?;
    Ok(HttpResponse::Ok().json(ListOrdersResponse::new(result, page, limit)))
}

/// PUT /merchant/orders/{id}/status
///
/// Moves an order along PENDING → SHIPPED → DELIVERED, or cancels it.
#[utoipa::path(
    put,
    path = "/merchant/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Caller is not a merchant"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed"),
    ),
    tag = "merchant"
)]
pub async fn update_status(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    caller.require_staff()?;
    let order_id = path.into_inner();
    let body = body.into_inner();
    let next = OrderStatus::from_str(&body.status)?;

    let order = blocking(move || {
        store
            .orders
            .update_status(order_id, next, body.tracking_number)
    })
    .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /merchant/orders/{id}/ship
#[utoipa::path(
    post,
    path = "/merchant/orders/{id}/ship",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = ShipRequest,
    responses(
        (status = 200, description = "Order shipped", body = OrderResponse),
        (status = 400, description = "Tracking number missing"),
        (status = 403, description = "Caller is not a merchant"),
        (status = 409, description = "Order is not pending"),
    ),
    tag = "merchant"
)]
pub async fn mark_shipped(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<ShipRequest>,
) -> Result<HttpResponse, AppError> {
    caller.require_staff()?;
    let order_id = path.into_inner();
    let tracking = body.into_inner().tracking_number;
    let order = blocking(move || store.orders.mark_shipped(order_id, &tracking)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /merchant/orders/{id}/deliver
#[utoipa::path(
    post,
    path = "/merchant/orders/{id}/deliver",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order delivered", body = OrderResponse),
        (status = 403, description = "Caller is not a merchant"),
        (status = 409, description = "Order is not shipped"),
    ),
    tag = "merchant"
)]
pub async fn mark_delivered(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    caller.require_staff()?;
    let order_id = path.into_inner();
    let order = blocking(move || store.orders.mark_delivered(order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /merchant/orders/{id}/payment
///
/// Records that the order has been paid.
#[utoipa::path(
    post,
    path = "/merchant/orders/{id}/payment",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Payment recorded", body = OrderResponse),
        (status = 403, description = "Caller is not a merchant"),
        (status = 409, description = "Order cannot be paid"),
    ),
    tag = "merchant"
)]
pub async fn record_payment(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    caller.require_staff()?;
    let order_id = path.into_inner();
    let order = blocking(move || store.orders.record_payment(order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
