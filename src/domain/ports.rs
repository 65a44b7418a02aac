use std::sync::Arc;

use uuid::Uuid;

use super::cart::CartLineView;
use super::catalog::{ProductDraft, ProductView};
use super::errors::DomainError;
use super::order::{ListResult, OrderView, StatusChange};
use super::wishlist::WishlistItemView;

pub trait CatalogRepository: Send + Sync + 'static {
    fn search(&self, query: &str) -> Result<Vec<ProductView>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<ProductView>, DomainError>;
    fn create(&self, draft: ProductDraft) -> Result<ProductView, DomainError>;
}

/// Cart lines are always addressed through their owner; a line id that
/// belongs to another user is reported as `NotFound`.
pub trait CartRepository: Send + Sync + 'static {
    /// Adds `quantity` units, merging into an existing line for the product.
    fn add_item(&self, user_id: Uuid, product_id: Uuid, quantity: i32)
        -> Result<CartLineView, DomainError>;
    fn set_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32)
        -> Result<CartLineView, DomainError>;
    fn remove_item(&self, user_id: Uuid, line_id: Uuid) -> Result<(), DomainError>;
    fn clear(&self, user_id: Uuid) -> Result<(), DomainError>;
    fn lines(&self, user_id: Uuid) -> Result<Vec<CartLineView>, DomainError>;
}

/// Every mutating method runs as a single atomic unit against the store.
pub trait OrderRepository: Send + Sync + 'static {
    /// Converts the user's cart into a pending order, decrementing stock.
    fn place(&self, user_id: Uuid) -> Result<OrderView, DomainError>;
    /// Applies a status change; `owner` restricts the lookup to one user.
    fn transition(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
        change: StatusChange,
    ) -> Result<OrderView, DomainError>;
    fn record_payment(&self, order_id: Uuid) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, order_id: Uuid, owner: Option<Uuid>) -> Result<Option<OrderView>, DomainError>;
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

pub trait WishlistRepository: Send + Sync + 'static {
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItemView, DomainError>;
    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItemView>, DomainError>;
    fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<(), DomainError>;
}

impl<R: CatalogRepository + ?Sized> CatalogRepository for Arc<R> {
    fn search(&self, query: &str) -> Result<Vec<ProductView>, DomainError> {
        (**self).search(query)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        (**self).find_by_id(id)
    }

    fn create(&self, draft: ProductDraft) -> Result<ProductView, DomainError> {
        (**self).create(draft)
    }
}

impl<R: CartRepository + ?Sized> CartRepository for Arc<R> {
    fn add_item(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartLineView, DomainError> {
        (**self).add_item(user_id, product_id, quantity)
    }

    fn set_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> Result<CartLineView, DomainError> {
        (**self).set_quantity(user_id, line_id, quantity)
    }

    fn remove_item(&self, user_id: Uuid, line_id: Uuid) -> Result<(), DomainError> {
        (**self).remove_item(user_id, line_id)
    }

    fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        (**self).clear(user_id)
    }

    fn lines(&self, user_id: Uuid) -> Result<Vec<CartLineView>, DomainError> {
        (**self).lines(user_id)
    }
}

impl<R: OrderRepository + ?Sized> OrderRepository for Arc<R> {
    fn place(&self, user_id: Uuid) -> Result<OrderView, DomainError> {
        (**self).place(user_id)
    }

    fn transition(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
        change: StatusChange,
    ) -> Result<OrderView, DomainError> {
        (**self).transition(order_id, owner, change)
    }

    fn record_payment(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        (**self).record_payment(order_id)
    }

    fn find_by_id(&self, order_id: Uuid, owner: Option<Uuid>) -> Result<Option<OrderView>, DomainError> {
        (**self).find_by_id(order_id, owner)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        (**self).list_for_user(user_id)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        (**self).list(page, limit)
    }
}

impl<R: WishlistRepository + ?Sized> WishlistRepository for Arc<R> {
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItemView, DomainError> {
        (**self).add(user_id, product_id)
    }

    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItemView>, DomainError> {
        (**self).list(user_id)
    }

    fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<(), DomainError> {
        (**self).remove(user_id, item_id)
    }
}
