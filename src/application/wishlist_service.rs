use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::WishlistRepository;
use crate::domain::wishlist::WishlistItemView;

pub struct WishlistService<R> {
    repo: R,
}

impl<R: WishlistRepository> WishlistService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adding a product that is already saved returns the existing entry.
    pub fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItemView, DomainError> {
        super::retry_once("add to wishlist", || self.repo.add(user_id, product_id))
    }

    pub fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItemView>, DomainError> {
        self.repo.list(user_id)
    }

    pub fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<(), DomainError> {
        self.repo.remove(user_id, item_id)
    }
}
