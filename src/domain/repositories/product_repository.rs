use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::product::{Product, ProductChange};

/// Read-only access to the product catalogue
///
/// Every listing is ordered by product name ascending. Writes happen
/// outside this service; adapters report them through `subscribe`.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products
    async fn list(&self) -> Result<Vec<Product>, String>;

    /// Find a product by its SKU
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, String>;

    /// One page of products plus the total row count
    async fn page(&self, offset: u64, limit: u32) -> Result<(Vec<Product>, u64), String>;

    /// Row-level changes observed after this call
    fn subscribe(&self) -> broadcast::Receiver<ProductChange>;
}
