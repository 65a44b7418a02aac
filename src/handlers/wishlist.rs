use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::Storefront;
use crate::domain::identity::Caller;
use crate::domain::wishlist::WishlistItemView;
use crate::errors::AppError;

use super::blocking;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToWishlistRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: String,
    pub added_at: String,
}

impl From<WishlistItemView> for WishlistItemResponse {
    fn from(w: WishlistItemView) -> Self {
        Self {
            id: w.id,
            product_id: w.product_id,
            product_name: w.product_name,
            price: w.price.to_string(),
            added_at: w.added_at.to_rfc3339(),
        }
    }
}

/// GET /wishlist
#[utoipa::path(
    get,
    path = "/wishlist",
    responses(
        (status = 200, description = "Saved products, newest first", body = [WishlistItemResponse]),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "wishlist"
)]
pub async fn list_wishlist(
    store: web::Data<Storefront>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let items = blocking(move || store.wishlist.list(caller.user_id)).await?;
    let body: Vec<WishlistItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /wishlist
///
/// Saving a product twice returns the existing entry.
#[utoipa::path(
    post,
    path = "/wishlist",
    request_body = AddToWishlistRequest,
    responses(
        (status = 200, description = "Product saved", body = WishlistItemResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "wishlist"
)]
pub async fn add_to_wishlist(
    store: web::Data<Storefront>,
    caller: Caller,
    body: web::Json<AddToWishlistRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body.into_inner().product_id;
    let item = blocking(move || store.wishlist.add(caller.user_id, product_id)).await?;
    Ok(HttpResponse::Ok().json(WishlistItemResponse::from(item)))
}

/// DELETE /wishlist/{id}
#[utoipa::path(
    delete,
    path = "/wishlist/{id}",
    params(
        ("id" = Uuid, Path, description = "Wishlist item UUID"),
    ),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Item not found"),
    ),
    tag = "wishlist"
)]
pub async fn remove_from_wishlist(
    store: web::Data<Storefront>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    blocking(move || store.wishlist.remove(caller.user_id, item_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
