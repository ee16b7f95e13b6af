use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::domain::product::{
    Product, ProductChange, ProductChangeKind, PRODUCT_CHANGE_CAPACITY,
};
use crate::domain::repositories::ProductRepository;

/// In-process ProductRepository, kept sorted by name
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
    changes: broadcast::Sender<ProductChange>,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::with_products(Vec::new())
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut products: Vec<Product> = products.into_iter().collect();
        sort(&mut products);
        let (changes, _) = broadcast::channel(PRODUCT_CHANGE_CAPACITY);
        Self {
            products: RwLock::new(products),
            changes,
        }
    }

    /// Insert or replace a product by SKU
    pub async fn upsert(&self, product: Product) {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.sku != product.sku);
        let kind = if products.len() < before {
            ProductChangeKind::Update
        } else {
            ProductChangeKind::Insert
        };
        let sku = product.sku.clone();
        products.push(product);
        sort(&mut products);
        drop(products);

        self.publish(ProductChange::new(kind, sku));
    }

    /// Remove a product; returns whether it existed
    pub async fn remove(&self, sku: &str) -> bool {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.sku != sku);
        let removed = products.len() < before;
        drop(products);

        if removed {
            self.publish(ProductChange::new(ProductChangeKind::Delete, sku));
        }
        removed
    }

    fn publish(&self, change: ProductChange) {
        // No receivers is fine
        let _ = self.changes.send(change);
    }
}

fn sort(products: &mut [Product]) {
    products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.sku.cmp(&b.sku)));
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, String> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, String> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.sku == sku)
            .cloned())
    }

    async fn page(&self, offset: u64, limit: u32) -> Result<(Vec<Product>, u64), String> {
        let products = self.products.read().await;
        let rows = products
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((rows, products.len() as u64))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProductChange> {
        self.changes.subscribe()
    }
}
