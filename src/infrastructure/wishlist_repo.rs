use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::WishlistRepository;
use crate::domain::wishlist::WishlistItemView;
use crate::schema::{products, wishlist_items};

use super::models::{NewWishlistItemRow, ProductRow, WishlistItemRow};
use super::store::DieselStore;

fn to_view(item: WishlistItemRow, product: ProductRow) -> WishlistItemView {
    WishlistItemView {
        id: item.id,
        product_id: item.product_id,
        product_name: product.name,
        price: product.price,
        added_at: item.created_at,
    }
}

fn find_item(
    conn: &mut PgConnection,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<Option<WishlistItemView>, DomainError> {
    let row = wishlist_items::table
        .inner_join(products::table)
        .filter(wishlist_items::user_id.eq(user_id))
        .filter(wishlist_items::product_id.eq(product_id))
        .select((WishlistItemRow::as_select(), ProductRow::as_select()))
        .first::<(WishlistItemRow, ProductRow)>(conn)
        .optional()?;
    Ok(row.map(|(item, product)| to_view(item, product)))
}

impl WishlistRepository for DieselStore {
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItemView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let product_exists: i64 = products::table
                .filter(products::id.eq(product_id))
                .count()
                .get_result(conn)?;
            if product_exists == 0 {
                return Err(DomainError::NotFound);
            }

            diesel::insert_into(wishlist_items::table)
                .values(&NewWishlistItemRow {
                    id: Uuid::new_v4(),
                    user_id,
                    product_id,
                })
                .on_conflict((wishlist_items::user_id, wishlist_items::product_id))
                .do_nothing()
                .execute(conn)?;

            find_item(conn, user_id, product_id)?.ok_or_else(|| {
                DomainError::Internal(format!("wishlist entry for {product_id} vanished"))
            })
        })
    }

    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItemView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<(WishlistItemRow, ProductRow)> = wishlist_items::table
            .inner_join(products::table)
            .filter(wishlist_items::user_id.eq(user_id))
            .order((wishlist_items::created_at.desc(), wishlist_items::id.asc()))
            .select((WishlistItemRow::as_select(), ProductRow::as_select()))
            .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(item, product)| to_view(item, product))
            .collect())
    }

    fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(
            wishlist_items::table
                .filter(wishlist_items::id.eq(item_id))
                .filter(wishlist_items::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_support::{seed_product, seed_subcategory, setup_db};

    #[tokio::test]
    #[ignore = "requires a container runtime for Postgres"]
    async fn adding_twice_keeps_one_entry() {
        let (_container, pool) = setup_db().await;
        let subcategory = seed_subcategory(&pool, "Kitchen");
        let mug = seed_product(&pool, subcategory, "Mug", None, "9.99", 5);
        let store = DieselStore::new(pool);
        let user = Uuid::new_v4();

        let first = store.add(user, mug).expect("first add");
        let second = store.add(user, mug).expect("second add");

        assert_eq!(first.id, second.id);
        assert_eq!(store.list(user).expect("list").len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime for Postgres"]
    async fn remove_is_scoped_to_owner() {
        let (_container, pool) = setup_db().await;
        let subcategory = seed_subcategory(&pool, "Kitchen");
        let mug = seed_product(&pool, subcategory, "Mug", None, "9.99", 5);
        let store = DieselStore::new(pool);
        let user = Uuid::new_v4();

        let item = store.add(user, mug).expect("add");

        assert!(matches!(
            store.remove(Uuid::new_v4(), item.id),
            Err(DomainError::NotFound)
        ));
        store.remove(user, item.id).expect("owner removes");
        assert!(store.list(user).expect("list").is_empty());
    }
}
