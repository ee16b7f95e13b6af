use serde::{Deserialize, Serialize};

/// Buffered changes per subscriber before it starts lagging
pub const PRODUCT_CHANGE_CAPACITY: usize = 256;

/// What happened to a product row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single row-level change to the product catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductChange {
    pub kind: ProductChangeKind,
    pub sku: String,
}

impl ProductChange {
    pub fn new(kind: ProductChangeKind, sku: impl Into<String>) -> Self {
        Self {
            kind,
            sku: sku.into(),
        }
    }
}
