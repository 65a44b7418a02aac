use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::schema::products;

use super::models::ProductRow;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::SerializationFailure | DatabaseErrorKind::UniqueViolation),
                info,
            ) => DomainError::TransactionFailure(format!("{kind:?}: {}", info.message())),
            // Diesel has no kind for SQLSTATE 40P01.
            DieselError::DatabaseError(_, info) if is_deadlock(info.message()) => {
                DomainError::TransactionFailure(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

fn is_deadlock(message: &str) -> bool {
    message.starts_with("deadlock detected")
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Postgres-backed implementation of every storefront repository.
#[derive(Clone)]
pub struct DieselStore {
    pub(super) pool: DbPool,
}

impl DieselStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Reads a product row and holds its lock until the transaction ends.
pub(super) fn lock_product(
    conn: &mut PgConnection,
    product_id: Uuid,
) -> Result<Option<ProductRow>, DomainError> {
    Ok(products::table
        .filter(products::id.eq(product_id))
        .select(ProductRow::as_select())
        .for_update()
        .first(conn)
        .optional()?)
}

/// Locks several product rows, always in id order so concurrent
/// transactions cannot deadlock on each other.
pub(super) fn lock_products(
    conn: &mut PgConnection,
    mut product_ids: Vec<Uuid>,
) -> Result<Vec<ProductRow>, DomainError> {
    product_ids.sort_unstable();
    product_ids.dedup();
    Ok(products::table
        .filter(products::id.eq_any(product_ids))
        .order(products::id.asc())
        .select(ProductRow::as_select())
        .for_update()
        .load(conn)?)
}

/// Escapes LIKE wildcards so the query is matched as a literal substring.
pub(super) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
