use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::product::{
    Pagination, Product, ProductChange, ProductFilter, ProductWithStock, StockSummary,
};
use crate::domain::repositories::ProductRepository;
use crate::domain::validation::ValidationErrors;
use crate::services::errors::{ProductError, ProductResult};
use crate::services::subscription::Subscription;

/// One page of rows plus the total row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: u64,
    pub page: u32,
    pub limit: u32,
}

/// Product queries for the dashboard
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// All products matching `filter`, with availability attached
    pub async fn list_products_with_stock(
        &self,
        filter: &ProductFilter,
    ) -> ProductResult<Vec<ProductWithStock>> {
        let products = self.products.list().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch products with stock");
            ProductError::Store(e)
        })?;

        Ok(products
            .into_iter()
            .filter(|p| filter.accepts(p))
            .map(ProductWithStock::from)
            .collect())
    }

    pub async fn get_product_by_sku(&self, sku: &str) -> ProductResult<Product> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Err(ValidationErrors::single("sku", "SKU is required").into());
        }

        self.products
            .find_by_sku(sku)
            .await
            .map_err(|e| {
                tracing::error!(sku, error = %e, "Failed to fetch product by SKU");
                ProductError::Store(e)
            })?
            .ok_or_else(|| ProductError::NotFound(sku.to_string()))
    }

    pub async fn list_products_paginated(
        &self,
        pagination: Pagination,
    ) -> ProductResult<Page<Product>> {
        let (data, count) = self
            .products
            .page(pagination.offset(), pagination.limit())
            .await
            .map_err(|e| {
                tracing::error!(page = pagination.page(), error = %e, "Failed to fetch paginated products");
                ProductError::Store(e)
            })?;

        Ok(Page {
            data,
            count,
            page: pagination.page(),
            limit: pagination.limit(),
        })
    }

    /// Product totals per availability status
    pub async fn stock_summary(&self) -> ProductResult<StockSummary> {
        let products = self.products.list().await.map_err(ProductError::Store)?;
        Ok(StockSummary::from_products(&products))
    }

    /// Registers a listener for product catalogue changes
    ///
    /// Changes observed after this call returns are delivered in order until
    /// the handle is cancelled or dropped.
    pub fn subscribe_to_products<F>(&self, mut listener: F) -> Subscription
    where
        F: FnMut(ProductChange) + Send + 'static,
    {
        let mut changes = self.products.subscribe();

        Subscription::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => listener(change),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Product change listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
