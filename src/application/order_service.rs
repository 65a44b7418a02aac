use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, OrderStatus, OrderView, StatusChange};
use crate::domain::ports::OrderRepository;

pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn place_order(&self, user_id: Uuid) -> Result<OrderView, DomainError> {
        match super::retry_once("place order", || self.repo.place(user_id)) {
            Ok(order) => {
                log::info!(
                    "order {} placed by {} ({} lines, total {})",
                    order.id,
                    user_id,
                    order.lines.len(),
                    order.total_amount
                );
                Ok(order)
            }
            Err(e) => {
                log::warn!("checkout rejected for {user_id}: {e}");
                Err(e)
            }
        }
    }

    /// Cancels one of the caller's orders, putting its units back into stock.
    pub fn cancel_order(&self, order_id: Uuid, user_id: Uuid) -> Result<OrderView, DomainError> {
        let order = super::retry_once("cancel order", || {
            self.repo
                .transition(order_id, Some(user_id), StatusChange::cancel())
        })?;
        log::info!("order {order_id} cancelled by {user_id}");
        Ok(order)
    }

    /// Merchant-side status change, validated against the order state machine.
    pub fn update_status(
        &self,
        order_id: Uuid,
        next: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<OrderView, DomainError> {
        let tracking_number = tracking_number
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let order = super::retry_once("update order status", || {
            self.repo.transition(
                order_id,
                None,
                StatusChange {
                    next,
                    tracking_number: tracking_number.clone(),
                },
            )
        })?;
        log::info!("order {order_id} moved to {next}");
        Ok(order)
    }

    pub fn mark_shipped(&self, order_id: Uuid, tracking_number: &str) -> Result<OrderView, DomainError> {
        if tracking_number.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "tracking number is required to mark as shipped".into(),
            ));
        }
        self.update_status(order_id, OrderStatus::Shipped, Some(tracking_number.to_string()))
    }

    pub fn mark_delivered(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        self.update_status(order_id, OrderStatus::Delivered, None)
    }

    pub fn record_payment(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        let order = super::retry_once("record payment", || self.repo.record_payment(order_id))?;
        log::info!("payment recorded for order {order_id}");
        Ok(order)
    }

    pub fn get_order(&self, order_id: Uuid, user_id: Uuid) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_id(order_id, Some(user_id))?
            .ok_or(DomainError::NotFound)
    }

    pub fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list_for_user(user_id)
    }

    pub fn list_all_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page.max(1), limit.clamp(1, MAX_PAGE_SIZE))
    }
}
