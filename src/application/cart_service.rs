use uuid::Uuid;

use crate::domain::cart::{ensure_positive, CartLineView, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

/// Result of a quantity update: either the line survived or it was dropped.
#[derive(Debug, Clone)]
pub enum QuantityUpdate {
    Updated(CartLineView),
    Removed,
}

pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stock is checked here but only reserved when the order is placed.
    pub fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineView, DomainError> {
        ensure_positive(quantity)?;
        super::retry_once("add to cart", || {
            self.repo.add_item(user_id, product_id, quantity)
        })
    }

    pub fn update_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<QuantityUpdate, DomainError> {
        if quantity < 1 {
            self.remove_item(user_id, line_id)?;
            return Ok(QuantityUpdate::Removed);
        }
        self.repo
            .set_quantity(user_id, line_id, quantity)
            .map(QuantityUpdate::Updated)
    }

    pub fn remove_item(&self, user_id: Uuid, line_id: Uuid) -> Result<(), DomainError> {
        self.repo.remove_item(user_id, line_id)
    }

    pub fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.repo.clear(user_id)
    }

    pub fn view(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        Ok(CartView::from_lines(self.repo.lines(user_id)?))
    }

    pub fn item_count(&self, user_id: Uuid) -> Result<i64, DomainError> {
        Ok(self.view(user_id)?.item_count)
    }
}
