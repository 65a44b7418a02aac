use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::cart_service::QuantityUpdate;
use crate::application::Storefront;
use crate::domain::cart::{CartLineView, CartView};
use crate::domain::identity::Caller;
use crate::errors::AppError;

use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// A quantity below 1 removes the line.
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
    /// Units currently on the shelf, for the "only N left" hint.
    pub stock: i32,
}

impl From<CartLineView> for CartLineResponse {
    fn from(l: CartLineView) -> Self {
        Self {
            line_total: l.line_total().to_string(),
            id: l.id,
            product_id: l.product_id,
            product_name: l.product_name,
            unit_price: l.unit_price.to_string(),
            quantity: l.quantity,
            stock: l.stock,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    pub total: String,
    pub item_count: i64,
}

impl From<CartView> for CartResponse {
    fn from(c: CartView) -> Self {
        Self {
            lines: c.lines.into_iter().map(Into::into).collect(),
            total: c.total.to_string(),
            item_count: c.item_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartCountResponse {
    pub count: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "The caller's cart", body = CartResponse),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "cart"
)]
pub async fn view_cart(
    store: web::Data<Storefront>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let cart = blocking(move || store.cart.view(caller.user_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// GET /cart/count
///
/// Total units in the cart, used for the header badge.
#[utoipa::path(
    get,
    path = "/cart/count",
    responses(
        (status = 200, description = "Unit count", body = CartCountResponse),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "cart"
)]
pub async fn cart_count(
    store: web::Data<Storefront>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let count = blocking(move || store.cart.item_count(caller.user_id)).await?;
    Ok(HttpResponse::Ok().json(CartCountResponse { count }))
}

/// POST /cart/items
///
/// Adds a product, merging with an existing line for the same product.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line added or merged", body = CartLineResponse),
        (status = 400, description = "Quantity must be positive"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Not enough stock"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    store: web::Data<Storefront>,
    caller: Caller,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let line = blocking(move || {
        store
            .cart
            .add_item(caller.user_id, body.product_id, body.quantity)
    })
    .await?;
    Ok(HttpResponse::Ok().json(CartLineResponse::from(line)))
}

/// PUT /cart/items/{id}
#[utoipa::path(
    put,
    path = "/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart line UUID"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Line updated", body = CartLineResponse),
        (status = 204, description = "Line removed"),
        (status = 404, description = "Line not found"),
        (status = 409, description = "Not enough stock"),
    ),
    tag = "cart"
)]
pub async fn update_quantity(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    let update = blocking(move || {
        store
            .cart
            .update_quantity(caller.user_id, line_id, quantity)
    })
    .await?;
    Ok(match update {
        QuantityUpdate::Updated(line) => HttpResponse::Ok().json(CartLineResponse::from(line)),
        QuantityUpdate::Removed => HttpResponse::NoContent().finish(),
    })
}

/// DELETE /cart/items/{id}
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart line UUID"),
    ),
    responses(
        (status = 204, description = "Line removed"),
        (status = 404, description = "Line not found"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    blocking(move || store.cart.remove_item(caller.user_id, line_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses(
        (status = 204, description = "Cart emptied"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    store: web::Data<Storefront>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    blocking(move || store.cart.clear(caller.user_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
