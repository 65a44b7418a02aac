pub mod cart_service;
pub mod catalog_service;
pub mod order_service;
pub mod wishlist_service;

use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, CatalogRepository, OrderRepository, WishlistRepository};

pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use wishlist_service::WishlistService;

/// Runs `op`, retrying it once if the store aborted the transaction.
pub(crate) fn retry_once<T>(
    what: &str,
    mut op: impl FnMut() -> Result<T, DomainError>,
) -> Result<T, DomainError> {
    match op() {
        Err(e) if e.is_retryable() => {
            log::warn!("{what}: transaction aborted ({e}), retrying once");
            op()
        }
        other => other,
    }
}

/// Everything a request handler needs, behind shared trait objects.
pub struct Storefront {
    pub catalog: CatalogService<Arc<dyn CatalogRepository>>,
    pub cart: CartService<Arc<dyn CartRepository>>,
    pub orders: OrderService<Arc<dyn OrderRepository>>,
    pub wishlist: WishlistService<Arc<dyn WishlistRepository>>,
}

impl Storefront {
    pub fn new<S>(store: S) -> Self
    where
        S: CatalogRepository + CartRepository + OrderRepository + WishlistRepository,
    {
        let store = Arc::new(store);
        Self {
            catalog: CatalogService::new(store.clone() as Arc<dyn CatalogRepository>),
            cart: CartService::new(store.clone() as Arc<dyn CartRepository>),
            orders: OrderService::new(store.clone() as Arc<dyn OrderRepository>),
            wishlist: WishlistService::new(store as Arc<dyn WishlistRepository>),
        }
    }
}
