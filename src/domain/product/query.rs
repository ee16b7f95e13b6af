use super::availability::AvailabilityStatus;
use super::product::Product;
use crate::domain::validation::ValidationErrors;
use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Validated page request
///
/// # Invariants
/// - `page >= 1`
/// - `1 <= limit <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Validates raw page parameters, substituting defaults for missing values
    ///
    /// # Example
    /// ```
    /// use stockdesk_api::domain::product::Pagination;
    ///
    /// let pagination = Pagination::new(Some(3), Some(10)).expect("valid page");
    /// assert_eq!(pagination.offset(), 20);
    /// assert!(Pagination::new(Some(0), None).is_err());
    /// ```
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let page = page.unwrap_or(DEFAULT_PAGE as i64);
        let limit = limit.unwrap_or(DEFAULT_LIMIT as i64);

        if page < 1 || page > u32::MAX as i64 {
            errors.add("page", "Page number must be greater than 0");
        }
        if limit < 1 {
            errors.add("limit", "Limit must be at least 1");
        } else if limit > MAX_LIMIT as i64 {
            errors.add("limit", "Limit cannot exceed 100");
        }

        errors.into_result()?;

        Ok(Self {
            page: page as u32,
            limit: limit as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before this page
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Search and status filter for the stock listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    search: Option<String>,
    status: Option<AvailabilityStatus>,
}

impl ProductFilter {
    /// Builds a filter from raw query values
    ///
    /// A blank search and the status `all` both mean "no filter".
    pub fn new(search: Option<&str>, status: Option<&str>) -> Result<Self, ValidationErrors> {
        let search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let status = match status.map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => match raw.parse::<AvailabilityStatus>() {
                Ok(status) => Some(status),
                Err(e) => return Err(ValidationErrors::single("status", e)),
            },
        };

        Ok(Self { search, status })
    }

    pub fn accepts(&self, product: &Product) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |query| product.matches(query));
        let status_ok = self
            .status
            .map_or(true, |status| product.availability_status() == status);

        search_ok && status_ok
    }
}
