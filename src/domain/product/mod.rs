// Product domain module
// Inventory products, their derived availability and listing queries

#![allow(clippy::module_inception)]

pub mod availability;
pub mod change;
pub mod product;
pub mod query;

pub use availability::{AvailabilityStatus, LOW_STOCK_THRESHOLD};
pub use change::{ProductChange, ProductChangeKind, PRODUCT_CHANGE_CAPACITY};
pub use product::{Product, ProductWithStock, StockSummary};
pub use query::{Pagination, ProductFilter};
