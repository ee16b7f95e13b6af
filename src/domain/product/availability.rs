use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Products with at most this many buildable units are reported as low stock
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Availability of a product, derived from its buildable units
///
/// # Policy
/// ```text
/// 0           -> OutOfStock
/// 1..=10      -> LowStock
/// 11..        -> Available
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// More than the low stock threshold can be built
    Available,
    /// Between one unit and the threshold can be built
    LowStock,
    /// Nothing can be built
    OutOfStock,
}

impl AvailabilityStatus {
    /// Classifies a number of buildable units
    ///
    /// # Example
    /// ```
    /// use stockdesk_api::domain::product::AvailabilityStatus;
    ///
    /// assert_eq!(AvailabilityStatus::classify(0), AvailabilityStatus::OutOfStock);
    /// assert_eq!(AvailabilityStatus::classify(10), AvailabilityStatus::LowStock);
    /// assert_eq!(AvailabilityStatus::classify(11), AvailabilityStatus::Available);
    /// ```
    pub fn classify(buildable_units: u32) -> Self {
        match buildable_units {
            0 => AvailabilityStatus::OutOfStock,
            1..=LOW_STOCK_THRESHOLD => AvailabilityStatus::LowStock,
            _ => AvailabilityStatus::Available,
        }
    }

    /// Classifies a signed unit count, rejecting negative values
    pub fn try_classify(buildable_units: i64) -> Result<Self, String> {
        u32::try_from(buildable_units)
            .map(Self::classify)
            .map_err(|_| format!("Buildable units cannot be negative: {}", buildable_units))
    }

    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::LowStock => "low_stock",
            AvailabilityStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvailabilityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(AvailabilityStatus::Available),
            "low_stock" => Ok(AvailabilityStatus::LowStock),
            "out_of_stock" => Ok(AvailabilityStatus::OutOfStock),
            other => Err(format!("Unknown availability status: {}", other)),
        }
    }
}
