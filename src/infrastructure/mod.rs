pub mod cart_repo;
pub mod catalog_repo;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod store;
pub mod wishlist_repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use memory::MemoryStore;
pub use store::DieselStore;
