use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct WishlistItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: BigDecimal,
    pub added_at: DateTime<Utc>,
}
