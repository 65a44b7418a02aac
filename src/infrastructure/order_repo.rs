use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    apply_change, plan_order, record_payment, CheckoutItem, ListResult, OrderLineView, OrderStatus,
    OrderView, PaymentStatus, StatusChange, StockLevel,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{cart_lines, order_lines, orders, products};

use super::models::{CartLineRow, NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};
use super::store::{lock_products, DieselStore};

/// Loads the lines of several orders at once, grouped by order id.
fn load_lines(
    conn: &mut PgConnection,
    order_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<OrderLineView>>, DomainError> {
    let rows: Vec<(OrderLineRow, String)> = order_lines::table
        .inner_join(products::table)
        .filter(order_lines::order_id.eq_any(order_ids))
        .order((order_lines::created_at.asc(), order_lines::id.asc()))
        .select((OrderLineRow::as_select(), products::name))
        .load(conn)?;

    let mut grouped: HashMap<Uuid, Vec<OrderLineView>> = HashMap::new();
    for (line, product_name) in rows {
        grouped
            .entry(line.order_id)
            .or_default()
            .push(line.into_view(product_name));
    }
    Ok(grouped)
}

fn load_order(
    conn: &mut PgConnection,
    order_id: Uuid,
    owner: Option<Uuid>,
) -> Result<Option<OrderView>, DomainError> {
    let order: Option<OrderRow> = orders::table
        .filter(orders::id.eq(order_id))
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(order) = order.filter(|o| owner.map_or(true, |u| o.user_id == u)) else {
        return Ok(None);
    };

    let mut lines = load_lines(conn, vec![order.id])?;
    let lines = lines.remove(&order.id).unwrap_or_default();
    order.into_view(lines).map(Some)
}

fn reload_order(conn: &mut PgConnection, order_id: Uuid) -> Result<OrderView, DomainError> {
    load_order(conn, order_id, None)?
        .ok_or_else(|| DomainError::Internal(format!("order {order_id} vanished after write")))
}

/// Locks an order header for the rest of the transaction.
fn lock_order(
    conn: &mut PgConnection,
    order_id: Uuid,
    owner: Option<Uuid>,
) -> Result<OrderRow, DomainError> {
    let order: Option<OrderRow> = orders::table
        .filter(orders::id.eq(order_id))
        .select(OrderRow::as_select())
        .for_update()
        .first(conn)
        .optional()?;

    order
        .filter(|o| owner.map_or(true, |u| o.user_id == u))
        .ok_or(DomainError::NotFound)
}

/// Puts every unit of an order back into stock.
fn restore_stock(conn: &mut PgConnection, order_id: Uuid) -> Result<(), DomainError> {
    let lines: Vec<OrderLineRow> = order_lines::table
        .filter(order_lines::order_id.eq(order_id))
        .select(OrderLineRow::as_select())
        .load(conn)?;

    // BTreeMap keeps row locks in product-id order.
    let mut per_product: BTreeMap<Uuid, i32> = BTreeMap::new();
    for line in &lines {
        *per_product.entry(line.product_id).or_default() += line.quantity;
    }

    let now = Utc::now();
    for (product_id, quantity) in per_product {
        diesel::update(products::table.find(product_id))
            .set((
                products::stock.eq(products::stock + quantity),
                products::updated_at.eq(now),
            ))
            .execute(conn)?;
    }
    Ok(())
}

impl OrderRepository for DieselStore {
    fn place(&self, user_id: Uuid) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Lock the cart and every product it references
            let cart: Vec<CartLineRow> = cart_lines::table
                .filter(cart_lines::user_id.eq(user_id))
                .order((cart_lines::created_at.asc(), cart_lines::id.asc()))
                .select(CartLineRow::as_select())
                .for_update()
                .load(conn)?;
            if cart.is_empty() {
                return Err(DomainError::EmptyCart);
            }

            let locked = lock_products(conn, cart.iter().map(|l| l.product_id).collect())?;
            let levels: HashMap<Uuid, StockLevel> = locked
                .into_iter()
                .map(|p| {
                    (
                        p.id,
                        StockLevel {
                            price: p.price,
                            stock: p.stock,
                        },
                    )
                })
                .collect();

            // 2. Re-validate stock and snapshot prices
            let items: Vec<CheckoutItem> = cart
                .iter()
                .map(|l| CheckoutItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                })
                .collect();
            let plan = plan_order(&items, &levels)?;

            // 3. Insert the header and its lines
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id,
                    status: OrderStatus::Pending.to_string(),
                    payment_status: PaymentStatus::Unpaid.to_string(),
                    total_amount: plan.total.clone(),
                })
                .execute(conn)?;

            let new_lines: Vec<NewOrderLineRow> = plan
                .lines
                .iter()
                .map(|l| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price.clone(),
                })
                .collect();
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            // 4. Decrement stock
            let now = Utc::now();
            for line in &plan.lines {
                diesel::update(products::table.find(line.product_id))
                    .set((
                        products::stock.eq(products::stock - line.quantity),
                        products::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            // 5. Empty the cart
            diesel::delete(cart_lines::table.filter(cart_lines::user_id.eq(user_id)))
                .execute(conn)?;

            reload_order(conn, order_id)
        })
    }

    fn transition(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
        change: StatusChange,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order = lock_order(conn, order_id, owner)?;
            let applied = apply_change(
                order.status()?,
                order.payment_status()?,
                order.tracking_number.clone(),
                change,
            )?;

            if applied.restores_stock {
                restore_stock(conn, order.id)?;
            }

            diesel::update(orders::table.find(order.id))
                .set((
                    orders::status.eq(applied.status.to_string()),
                    orders::payment_status.eq(applied.payment_status.to_string()),
                    orders::tracking_number.eq(applied.tracking_number),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            reload_order(conn, order.id)
        })
    }

    fn record_payment(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order = lock_order(conn, order_id, None)?;
            let paid = record_payment(order.status()?, order.payment_status()?)?;
            let now = Utc::now();

            diesel::update(orders::table.find(order.id))
                .set((
                    orders::payment_status.eq(paid.to_string()),
                    orders::payment_date.eq(Some(now)),
                    orders::updated_at.eq(now),
                ))
                .execute(conn)?;

            reload_order(conn, order.id)
        })
    }

    fn find_by_id(&self, order_id: Uuid, owner: Option<Uuid>) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_order(&mut conn, order_id, owner)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user_id))
            .order((orders::created_at.desc(), orders::id.asc()))
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        let mut lines = load_lines(&mut conn, rows.iter().map(|o| o.id).collect())?;
        rows.into_iter()
            .map(|o| {
                let order_lines = lines.remove(&o.id).unwrap_or_default();
                o.into_view(order_lines)
            })
            .collect()
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows: Vec<OrderRow> = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.asc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(|o| o.into_view(vec![]))
                    .collect::<Result<_, _>>()?,
                total,
            })
        })
    }
}
