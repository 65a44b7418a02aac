use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cart::{ensure_in_stock, merged_quantity, CartLineView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_lines, products};

use super::models::{CartLineRow, NewCartLineRow, ProductRow};
use super::store::{lock_product, DieselStore};

fn load_line(
    conn: &mut PgConnection,
    user_id: Uuid,
    line_id: Uuid,
) -> Result<Option<CartLineView>, DomainError> {
    let row = cart_lines::table
        .inner_join(products::table)
        .filter(cart_lines::id.eq(line_id))
        .filter(cart_lines::user_id.eq(user_id))
        .select((CartLineRow::as_select(), ProductRow::as_select()))
        .first::<(CartLineRow, ProductRow)>(conn)
        .optional()?;
    Ok(row.map(|(line, product)| line.into_view(product)))
}

fn reload_line(conn: &mut PgConnection, user_id: Uuid, line_id: Uuid) -> Result<CartLineView, DomainError> {
    load_line(conn, user_id, line_id)?
        .ok_or_else(|| DomainError::Internal(format!("cart line {line_id} vanished after write")))
}

impl CartRepository for DieselStore {
    fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Cart line before product, the same order checkout locks them in.
            let existing: Option<CartLineRow> = cart_lines::table
                .filter(cart_lines::user_id.eq(user_id))
                .filter(cart_lines::product_id.eq(product_id))
                .select(CartLineRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            let product = lock_product(conn, product_id)?.ok_or(DomainError::NotFound)?;

            let wanted = merged_quantity(existing.as_ref().map(|l| l.quantity), quantity)?;
            ensure_in_stock(product_id, wanted, product.stock)?;

            let line_id = match existing {
                Some(line) => {
                    diesel::update(cart_lines::table.find(line.id))
                        .set((
                            cart_lines::quantity.eq(wanted),
                            cart_lines::updated_at.eq(chrono::Utc::now()),
                        ))
                        .execute(conn)?;
                    line.id
                }
                None => {
                    let id = Uuid::new_v4();
                    diesel::insert_into(cart_lines::table)
                        .values(&NewCartLineRow {
                            id,
                            user_id,
                            product_id,
                            quantity: wanted,
                        })
                        .execute(conn)?;
                    id
                }
            };

            reload_line(conn, user_id, line_id)
        })
    }

    fn set_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let line: CartLineRow = cart_lines::table
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_lines::user_id.eq(user_id))
                .select(CartLineRow::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound)?;
            let product = lock_product(conn, line.product_id)?.ok_or(DomainError::NotFound)?;
            ensure_in_stock(product.id, quantity, product.stock)?;

            diesel::update(cart_lines::table.find(line.id))
                .set((
                    cart_lines::quantity.eq(quantity),
                    cart_lines::updated_at.eq(chrono::Utc::now()),
                ))
                .execute(conn)?;

            reload_line(conn, user_id, line.id)
        })
    }

    fn remove_item(&self, user_id: Uuid, line_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(
            cart_lines::table
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_lines::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::delete(cart_lines::table.filter(cart_lines::user_id.eq(user_id)))
            .execute(&mut conn)?;
        Ok(())
    }

    fn lines(&self, user_id: Uuid) -> Result<Vec<CartLineView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<(CartLineRow, ProductRow)> = cart_lines::table
            .inner_join(products::table)
            .filter(cart_lines::user_id.eq(user_id))
            .order((cart_lines::updated_at.desc(), cart_lines::id.asc()))
            .select((CartLineRow::as_select(), ProductRow::as_select()))
            .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(line, product)| line.into_view(product))
            .collect())
    }
}
