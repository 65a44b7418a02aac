pub mod cart;
pub mod catalog;
pub mod docs;
pub mod identity;
pub mod merchant;
pub mod orders;
pub mod wishlist;

use actix_web::web;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Runs synchronous store work on actix's blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}
