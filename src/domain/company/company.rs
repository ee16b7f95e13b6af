use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Company aggregate root
///
/// Owned by the account provisioning workflow at creation time; users refer
/// to it through the `company_id` in their profile metadata.
///
/// # Invariants
/// - Name cannot be empty
/// - A missing address is `None`, never an empty string
/// - `updated_at` is never earlier than `created_at`
///
/// # Example
/// ```
/// use stockdesk_api::domain::company::Company;
///
/// let company = Company::new("ABC", Some("  ".to_string())).expect("valid company");
/// assert_eq!(company.name(), "ABC");
/// assert!(company.address().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    id: Uuid,
    name: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Partial update of a company's editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }
}

impl Company {
    /// Creates a new Company with a generated ID
    ///
    /// # Business Rules Enforced
    /// - Name must not be blank
    /// - Blank address is stored as `None`
    pub fn new(name: impl Into<String>, address: Option<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Company name cannot be empty".to_string());
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            address: address.filter(|a| !a.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update and bumps `updated_at`
    pub fn apply(&mut self, update: &CompanyUpdate) -> Result<(), String> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err("Company name cannot be empty".to_string());
            }
            self.name = name.clone();
        }
        if let Some(address) = &update.address {
            self.address = Some(address.clone()).filter(|a| !a.trim().is_empty());
        }
        self.updated_at = Utc::now().max(self.created_at);
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Company from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: Uuid,
        name: String,
        address: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            address,
            created_at,
            updated_at,
        }
    }
}
