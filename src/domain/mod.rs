//! Storefront rules that hold regardless of where rows are stored.

pub mod cart;
pub mod catalog;
pub mod errors;
pub mod identity;
pub mod order;
pub mod ports;
pub mod wishlist;
