use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Prices are stored as NUMERIC(12, 2).
pub const PRICE_SCALE: i64 = 2;

#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl ProductView {
    /// Case-insensitive substring match over name and description.
    /// A blank query matches every product.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Merchant input for a new catalog entry.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub subcategory_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("product name is required".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidInput(format!(
                "product name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if self
            .description
            .as_deref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(DomainError::InvalidInput(format!(
                "description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if self.price <= BigDecimal::from(0) {
            return Err(DomainError::InvalidInput("price must be greater than 0".into()));
        }
        if self.price.with_scale(PRICE_SCALE) != self.price {
            return Err(DomainError::InvalidInput(format!(
                "price cannot have more than {PRICE_SCALE} decimal places"
            )));
        }
        if self.stock < 0 {
            return Err(DomainError::InvalidInput("stock cannot be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(name: &str, description: Option<&str>) -> ProductView {
        ProductView {
            id: Uuid::new_v4(),
            subcategory_id: Uuid::new_v4(),
            subcategory_name: "Mugs".into(),
            name: name.into(),
            description: description.map(Into::into),
            price: BigDecimal::from(5),
            stock: 1,
            created_at: Utc::now(),
        }
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            subcategory_id: Uuid::new_v4(),
            name: "Enamel mug".into(),
            description: Some("Keeps coffee warm".into()),
            price: BigDecimal::from_str("12.50").expect("valid decimal"),
            stock: 4,
        }
    }

    #[test]
    fn matches_name_ignoring_case() {
        assert!(product("Enamel Mug", None).matches("mug"));
        assert!(product("Enamel Mug", None).matches("ENAMEL"));
    }

    #[test]
    fn matches_description() {
        assert!(product("Mug", Some("Hand-painted STONEWARE")).matches("stoneware"));
        assert!(!product("Mug", None).matches("stoneware"));
    }

    #[test]
    fn blank_query_matches_everything() {
        assert!(product("Mug", None).matches("   "));
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn draft_rejects_non_positive_price() {
        let d = ProductDraft {
            price: BigDecimal::from(0),
            ..draft()
        };
        assert!(matches!(d.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn draft_rejects_negative_stock_and_blank_name() {
        let d = ProductDraft { stock: -1, ..draft() };
        assert!(matches!(d.validate(), Err(DomainError::InvalidInput(_))));
        let d = ProductDraft {
            name: "  ".into(),
            ..draft()
        };
        assert!(matches!(d.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn draft_rejects_sub_cent_prices() {
        let mut d = draft();
        d.price = BigDecimal::from_str("9.999").expect("valid decimal");
        assert!(matches!(d.validate(), Err(DomainError::InvalidInput(_))));

        // Trailing zeros past the cent are still a whole-cent price.
        d.price = BigDecimal::from_str("9.990").expect("valid decimal");
        assert!(d.validate().is_ok());
    }

    #[test]
    fn draft_rejects_long_description() {
        let d = ProductDraft {
            description: Some("x".repeat(MAX_DESCRIPTION_LEN + 1)),
            ..draft()
        };
        assert!(matches!(d.validate(), Err(DomainError::InvalidInput(_))));
    }
}
