use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::catalog::{ProductDraft, ProductView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{products, subcategories};

use super::models::{NewProductRow, ProductRow};
use super::store::{like_pattern, DieselStore};

fn find_product(conn: &mut PgConnection, id: Uuid) -> Result<Option<ProductView>, DomainError> {
    let row = products::table
        .inner_join(subcategories::table)
        .filter(products::id.eq(id))
        .select((ProductRow::as_select(), subcategories::name))
        .first::<(ProductRow, String)>(conn)
        .optional()?;
    Ok(row.map(|(product, subcategory)| product.into_view(subcategory)))
}

impl CatalogRepository for DieselStore {
    fn search(&self, query: &str) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut select = products::table
            .inner_join(subcategories::table)
            .select((ProductRow::as_select(), subcategories::name))
            .order((products::name.asc(), products::id.asc()))
            .into_boxed();
        if !query.is_empty() {
            let pattern = like_pattern(query);
            select = select.filter(
                products::name
                    .ilike(pattern.clone())
                    .or(products::description.ilike(pattern)),
            );
        }

        let rows: Vec<(ProductRow, String)> = select.load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(product, subcategory)| product.into_view(subcategory))
            .collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        find_product(&mut conn, id)
    }

    fn create(&self, draft: ProductDraft) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let subcategory_exists: i64 = subcategories::table
                .filter(subcategories::id.eq(draft.subcategory_id))
                .count()
                .get_result(conn)?;
            if subcategory_exists == 0 {
                return Err(DomainError::NotFound);
            }

            let id = Uuid::new_v4();
            diesel::insert_into(products::table)
                .values(&NewProductRow {
                    id,
                    subcategory_id: draft.subcategory_id,
                    name: draft.name,
                    description: draft.description,
                    price: draft.price,
                    stock: draft.stock,
                })
                .execute(conn)?;

            find_product(conn, id)?
                .ok_or_else(|| DomainError::Internal(format!("product {id} vanished after insert")))
        })
    }
}
