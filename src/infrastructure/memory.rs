//! In-memory implementation of the storefront repositories.
//!
//! Every operation runs under a single lock, so each one is atomic and
//! concurrent checkouts are serialized the same way row locks serialize
//! them in Postgres. Useful for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::cart::{ensure_in_stock, merged_quantity, CartLineView};
use crate::domain::catalog::{ProductDraft, ProductView};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    apply_change, plan_order, record_payment, CheckoutItem, ListResult, OrderLineView, OrderStatus,
    OrderView, PaymentStatus, StatusChange, StockLevel,
};
use crate::domain::ports::{CartRepository, CatalogRepository, OrderRepository, WishlistRepository};
use crate::domain::wishlist::WishlistItemView;

#[derive(Debug, Clone)]
struct ProductRecord {
    id: Uuid,
    subcategory_id: Uuid,
    name: String,
    description: Option<String>,
    price: BigDecimal,
    stock: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CartRecord {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    updated_at: DateTime<Utc>,
    // Logical clock; wall-clock timestamps can tie.
    touched: u64,
}

#[derive(Debug, Clone)]
struct OrderRecord {
    id: Uuid,
    user_id: Uuid,
    status: OrderStatus,
    payment_status: PaymentStatus,
    total_amount: BigDecimal,
    tracking_number: Option<String>,
    payment_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Debug, Clone)]
struct OrderLineRecord {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
struct WishlistRecord {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    added_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    subcategories: HashMap<Uuid, String>,
    products: HashMap<Uuid, ProductRecord>,
    cart: Vec<CartRecord>,
    orders: Vec<OrderRecord>,
    order_lines: Vec<OrderLineRecord>,
    wishlist: Vec<WishlistRecord>,
    clock: u64,
}

impl MemoryState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn product_view(&self, product: &ProductRecord) -> ProductView {
        ProductView {
            id: product.id,
            subcategory_id: product.subcategory_id,
            subcategory_name: self
                .subcategories
                .get(&product.subcategory_id)
                .cloned()
                .unwrap_or_default(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.clone(),
            stock: product.stock,
            created_at: product.created_at,
        }
    }

    fn cart_view(&self, line: &CartRecord) -> Result<CartLineView, DomainError> {
        let product = self
            .products
            .get(&line.product_id)
            .ok_or_else(|| DomainError::Internal(format!("cart line {} lost its product", line.id)))?;
        Ok(CartLineView {
            id: line.id,
            product_id: line.product_id,
            product_name: product.name.clone(),
            unit_price: product.price.clone(),
            quantity: line.quantity,
            stock: product.stock,
            updated_at: line.updated_at,
        })
    }

    fn order_view(&self, order: &OrderRecord, with_lines: bool) -> OrderView {
        let lines = if with_lines {
            self.order_lines
                .iter()
                .filter(|l| l.order_id == order.id)
                .map(|l| OrderLineView {
                    id: l.id,
                    product_id: l.product_id,
                    product_name: self
                        .products
                        .get(&l.product_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    quantity: l.quantity,
                    unit_price: l.unit_price.clone(),
                })
                .collect()
        } else {
            vec![]
        };
        OrderView {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            payment_status: order.payment_status,
            total_amount: order.total_amount.clone(),
            tracking_number: order.tracking_number.clone(),
            payment_date: order.payment_date,
            created_at: order.created_at,
            lines,
        }
    }

    fn order_index(&self, order_id: Uuid, owner: Option<Uuid>) -> Option<usize> {
        self.orders
            .iter()
            .position(|o| o.id == order_id && owner.map_or(true, |u| o.user_id == u))
    }

    /// Orders newest first.
    fn sorted_orders(&self) -> Vec<&OrderRecord> {
        let mut orders: Vec<&OrderRecord> = self.orders.iter().collect();
        orders.sort_by(|a, b| b.seq.cmp(&a.seq));
        orders
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subcategory products can be filed under.
    pub fn add_subcategory(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().subcategories.insert(id, name.to_string());
        id
    }

    pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
        self.state.lock().products.get(&product_id).map(|p| p.stock)
    }
}

impl CatalogRepository for MemoryStore {
    fn search(&self, query: &str) -> Result<Vec<ProductView>, DomainError> {
        let state = self.state.lock();
        let mut found: Vec<ProductView> = state
            .products
            .values()
            .map(|p| state.product_view(p))
            .filter(|p| p.matches(query))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        let state = self.state.lock();
        Ok(state.products.get(&id).map(|p| state.product_view(p)))
    }

    fn create(&self, draft: ProductDraft) -> Result<ProductView, DomainError> {
        let mut state = self.state.lock();
        if !state.subcategories.contains_key(&draft.subcategory_id) {
            return Err(DomainError::NotFound);
        }
        let record = ProductRecord {
            id: Uuid::new_v4(),
            subcategory_id: draft.subcategory_id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            created_at: Utc::now(),
        };
        let view = state.product_view(&record);
        state.products.insert(record.id, record);
        Ok(view)
    }
}

impl CartRepository for MemoryStore {
    fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineView, DomainError> {
        let mut state = self.state.lock();
        let stock = state
            .products
            .get(&product_id)
            .map(|p| p.stock)
            .ok_or(DomainError::NotFound)?;

        let existing = state
            .cart
            .iter()
            .position(|l| l.user_id == user_id && l.product_id == product_id);
        let wanted = merged_quantity(existing.map(|i| state.cart[i].quantity), quantity)?;
        ensure_in_stock(product_id, wanted, stock)?;

        let touched = state.tick();
        let now = Utc::now();
        let index = match existing {
            Some(i) => {
                let line = &mut state.cart[i];
                line.quantity = wanted;
                line.updated_at = now;
                line.touched = touched;
                i
            }
            None => {
                state.cart.push(CartRecord {
                    id: Uuid::new_v4(),
                    user_id,
                    product_id,
                    quantity: wanted,
                    updated_at: now,
                    touched,
                });
                state.cart.len() - 1
            }
        };
        state.cart_view(&state.cart[index])
    }

    fn set_quantity(
        &self,
        user_id: Uuid,
        line_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineView, DomainError> {
        let mut state = self.state.lock();
        let index = state
            .cart
            .iter()
            .position(|l| l.id == line_id && l.user_id == user_id)
            .ok_or(DomainError::NotFound)?;
        let product_id = state.cart[index].product_id;
        let stock = state
            .products
            .get(&product_id)
            .map(|p| p.stock)
            .ok_or(DomainError::NotFound)?;
        ensure_in_stock(product_id, quantity, stock)?;

        let touched = state.tick();
        let line = &mut state.cart[index];
        line.quantity = quantity;
        line.updated_at = Utc::now();
        line.touched = touched;
        state.cart_view(&state.cart[index])
    }

    fn remove_item(&self, user_id: Uuid, line_id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        let before = state.cart.len();
        state.cart.retain(|l| !(l.id == line_id && l.user_id == user_id));
        if state.cart.len() == before {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.state.lock().cart.retain(|l| l.user_id != user_id);
        Ok(())
    }

    fn lines(&self, user_id: Uuid) -> Result<Vec<CartLineView>, DomainError> {
        let state = self.state.lock();
        let mut lines: Vec<&CartRecord> = state.cart.iter().filter(|l| l.user_id == user_id).collect();
        lines.sort_by(|a, b| b.touched.cmp(&a.touched));
        lines.into_iter().map(|l| state.cart_view(l)).collect()
    }
}

impl OrderRepository for MemoryStore {
    fn place(&self, user_id: Uuid) -> Result<OrderView, DomainError> {
        let mut state = self.state.lock();

        let mut cart: Vec<&CartRecord> = state.cart.iter().filter(|l| l.user_id == user_id).collect();
        cart.sort_by_key(|l| l.touched);
        let items: Vec<CheckoutItem> = cart
            .iter()
            .map(|l| CheckoutItem {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect();
        let levels: HashMap<Uuid, StockLevel> = items
            .iter()
            .filter_map(|i| state.products.get(&i.product_id))
            .map(|p| {
                (
                    p.id,
                    StockLevel {
                        price: p.price.clone(),
                        stock: p.stock,
                    },
                )
            })
            .collect();

        // Nothing is mutated until the whole plan validates.
        let plan = plan_order(&items, &levels)?;

        let order_id = Uuid::new_v4();
        let seq = state.tick();
        state.orders.push(OrderRecord {
            id: order_id,
            user_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            total_amount: plan.total,
            tracking_number: None,
            payment_date: None,
            created_at: Utc::now(),
            seq,
        });
        for line in plan.lines {
            if let Some(product) = state.products.get_mut(&line.product_id) {
                product.stock -= line.quantity;
            }
            state.order_lines.push(OrderLineRecord {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }
        state.cart.retain(|l| l.user_id != user_id);

        let index = state.orders.len() - 1;
        Ok(state.order_view(&state.orders[index], true))
    }

    fn transition(
        &self,
        order_id: Uuid,
        owner: Option<Uuid>,
        change: StatusChange,
    ) -> Result<OrderView, DomainError> {
        let mut state = self.state.lock();
        let index = state.order_index(order_id, owner).ok_or(DomainError::NotFound)?;
        let order = &state.orders[index];
        let applied = apply_change(
            order.status,
            order.payment_status,
            order.tracking_number.clone(),
            change,
        )?;

        if applied.restores_stock {
            let returned: Vec<(Uuid, i32)> = state
                .order_lines
                .iter()
                .filter(|l| l.order_id == order_id)
                .map(|l| (l.product_id, l.quantity))
                .collect();
            for (product_id, quantity) in returned {
                if let Some(product) = state.products.get_mut(&product_id) {
                    product.stock += quantity;
                }
            }
        }

        let order = &mut state.orders[index];
        order.status = applied.status;
        order.payment_status = applied.payment_status;
        order.tracking_number = applied.tracking_number;
        Ok(state.order_view(&state.orders[index], true))
    }

    fn record_payment(&self, order_id: Uuid) -> Result<OrderView, DomainError> {
        let mut state = self.state.lock();
        let index = state.order_index(order_id, None).ok_or(DomainError::NotFound)?;
        let order = &mut state.orders[index];
        order.payment_status = record_payment(order.status, order.payment_status)?;
        order.payment_date = Some(Utc::now());
        Ok(state.order_view(&state.orders[index], true))
    }

    fn find_by_id(&self, order_id: Uuid, owner: Option<Uuid>) -> Result<Option<OrderView>, DomainError> {
        let state = self.state.lock();
        Ok(state
            .order_index(order_id, owner)
            .map(|i| state.order_view(&state.orders[i], true)))
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let state = self.state.lock();
        Ok(state
            .sorted_orders()
            .into_iter()
            .filter(|o| o.user_id == user_id)
            .map(|o| state.order_view(o, true))
            .collect())
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let state = self.state.lock();
        let offset = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);
        let sorted = state.sorted_orders();
        Ok(ListResult {
            total: sorted.len() as i64,
            items: sorted
                .into_iter()
                .skip(offset)
                .take(limit)
                .map(|o| state.order_view(o, false))
                .collect(),
        })
    }
}

impl WishlistRepository for MemoryStore {
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItemView, DomainError> {
        let mut state = self.state.lock();
        let product = state.products.get(&product_id).cloned().ok_or(DomainError::NotFound)?;

        let existing = state
            .wishlist
            .iter()
            .find(|w| w.user_id == user_id && w.product_id == product_id)
            .cloned();
        let record = match existing {
            Some(record) => record,
            None => {
                let seq = state.tick();
                let record = WishlistRecord {
                    id: Uuid::new_v4(),
                    user_id,
                    product_id,
                    added_at: Utc::now(),
                    seq,
                };
                state.wishlist.push(record.clone());
                record
            }
        };

        Ok(WishlistItemView {
            id: record.id,
            product_id,
            product_name: product.name,
            price: product.price,
            added_at: record.added_at,
        })
    }

    fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItemView>, DomainError> {
        let state = self.state.lock();
        let mut items: Vec<&WishlistRecord> =
            state.wishlist.iter().filter(|w| w.user_id == user_id).collect();
        items.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(items
            .into_iter()
            .filter_map(|w| {
                state.products.get(&w.product_id).map(|p| WishlistItemView {
                    id: w.id,
                    product_id: w.product_id,
                    product_name: p.name.clone(),
                    price: p.price.clone(),
                    added_at: w.added_at,
                })
            })
            .collect())
    }

    fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock();
        let before = state.wishlist.len();
        state.wishlist.retain(|w| !(w.id == item_id && w.user_id == user_id));
        if state.wishlist.len() == before {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
