use super::availability::AvailabilityStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inventory product as stored by the data store
///
/// # Invariants
/// - SKU is non-empty and unique
/// - Buildable units are never negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub buildable_units: u32,
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Creates a new product stamped with the current time
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        buildable_units: u32,
    ) -> Result<Self, String> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err("SKU is required".to_string());
        }
        if name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }

        Ok(Self {
            sku,
            name,
            buildable_units,
            last_updated: Utc::now(),
        })
    }

    /// Reconstructs a product from a stored row
    ///
    /// Stored unit counts are signed integers; a negative count is treated as
    /// corrupt data and rejected rather than classified.
    pub fn from_persistence(
        sku: String,
        name: String,
        buildable_units: i32,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, String> {
        let buildable_units = u32::try_from(buildable_units).map_err(|_| {
            format!(
                "Product {} has negative buildable units: {}",
                sku, buildable_units
            )
        })?;

        Ok(Self {
            sku,
            name,
            buildable_units,
            last_updated,
        })
    }

    /// Returns the derived availability status
    pub fn availability_status(&self) -> AvailabilityStatus {
        AvailabilityStatus::classify(self.buildable_units)
    }

    /// Case-insensitive substring match over name and SKU
    ///
    /// `query` must already be trimmed and lowercased.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.sku.to_lowercase().contains(query)
    }
}

/// Product enriched with its availability status for a single response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWithStock {
    #[serde(flatten)]
    pub product: Product,
    pub availability_status: AvailabilityStatus,
}

impl From<Product> for ProductWithStock {
    fn from(product: Product) -> Self {
        let availability_status = product.availability_status();
        Self {
            product,
            availability_status,
        }
    }
}

/// Per-status product totals for the dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    pub total: usize,
    pub available: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl StockSummary {
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(Self::default(), |mut summary, product| {
                summary.total += 1;
                match product.availability_status() {
                    AvailabilityStatus::Available => summary.available += 1,
                    AvailabilityStatus::LowStock => summary.low_stock += 1,
                    AvailabilityStatus::OutOfStock => summary.out_of_stock += 1,
                }
                summary
            })
    }
}
