use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::domain::product::{Product, ProductChange, PRODUCT_CHANGE_CAPACITY};
use crate::domain::repositories::ProductRepository;

/// Channel the `notify_product_change` trigger publishes on
pub const PRODUCT_CHANGES_CHANNEL: &str = "product_changes";

/// Pause before receiving again after a listener error
const LISTEN_RETRY_DELAY: Duration = Duration::from_secs(1);

/// PostgreSQL implementation of ProductRepository
///
/// Change notifications only flow once `listen_for_changes` is running.
pub struct PostgresProductRepository {
    pool: PgPool,
    changes: broadcast::Sender<ProductChange>,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(PRODUCT_CHANGE_CAPACITY);
        Self { pool, changes }
    }

    /// Start relaying trigger notifications to subscribers
    ///
    /// The listener holds its own connection and reconnects on the next
    /// receive after the connection drops. Aborting the returned task stops
    /// the relay.
    pub async fn listen_for_changes(&self) -> Result<JoinHandle<()>, String> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| format!("Failed to connect change listener: {}", e))?;
        listener
            .listen(PRODUCT_CHANGES_CHANNEL)
            .await
            .map_err(|e| format!("Failed to listen on {}: {}", PRODUCT_CHANGES_CHANNEL, e))?;

        let changes = self.changes.clone();
        Ok(tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        match serde_json::from_str::<ProductChange>(notification.payload()) {
                            Ok(change) => {
                                let _ = changes.send(change);
                            }
                            Err(e) => {
                                tracing::warn!(
                                    payload = notification.payload(),
                                    error = %e,
                                    "Ignoring malformed product change notification"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Product change listener failed");
                        tokio::time::sleep(LISTEN_RETRY_DELAY).await;
                    }
                }
            }
        }))
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    sku: String,
    name: String,
    buildable_units: i32,
    last_updated: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = String;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        Product::from_persistence(r.sku, r.name, r.buildable_units, r.last_updated)
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, String> {
    rows.into_iter().map(Product::try_from).collect()
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(&self) -> Result<Vec<Product>, String> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT sku, name, buildable_units, last_updated
            FROM products
            ORDER BY name ASC, sku ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list products: {}", e))?;

        into_products(rows)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, String> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT sku, name, buildable_units, last_updated
            FROM products
            WHERE sku = $1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find product by sku: {}", e))?;

        row.map(Product::try_from).transpose()
    }

    async fn page(&self, offset: u64, limit: u32) -> Result<(Vec<Product>, u64), String> {
        // Count and rows come from one snapshot so they always agree
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to start transaction: {}", e))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to set isolation level: {}", e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| format!("Failed to count products: {}", e))?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT sku, name, buildable_units, last_updated
            FROM products
            ORDER BY name ASC, sku ASC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| format!("Failed to fetch product page: {}", e))?;

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit transaction: {}", e))?;

        Ok((into_products(rows)?, count.max(0) as u64))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProductChange> {
        self.changes.subscribe()
    }
}
