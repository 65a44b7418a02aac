use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::Storefront;
use crate::domain::catalog::ProductView;
use crate::errors::AppError;

use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
    pub stock: i32,
    pub created_at: String,
}

impl From<ProductView> for ProductResponse {
    fn from(p: ProductView) -> Self {
        Self {
            id: p.id,
            subcategory_id: p.subcategory_id,
            subcategory_name: p.subcategory_name,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            stock: p.stock,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive text matched against name and description.
    pub q: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// Lists the catalog, optionally filtered by a search term. Open to anyone.
#[utoipa::path(
    get,
    path = "/products",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn search_products(
    store: web::Data<Storefront>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner().q;
    let products = blocking(move || store.catalog.search(q.as_deref())).await?;
    let body: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    store: web::Data<Storefront>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = blocking(move || store.catalog.get(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}
