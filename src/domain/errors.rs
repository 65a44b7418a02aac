use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found")]
    NotFound,
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },
    #[error("Not allowed to act on this resource")]
    Unauthorized,
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Transaction aborted: {0}")]
    TransactionFailure(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        DomainError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Store-level aborts the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::TransactionFailure(_))
    }
}
