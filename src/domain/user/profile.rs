use super::value_objects::Email;
use crate::domain::company::Company;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile metadata stored on the identity by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub first_name: String,
    pub last_name: String,
    pub company_id: Option<Uuid>,
}

/// Partial metadata update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }

    pub fn apply_to(&self, metadata: &mut UserMetadata) {
        if let Some(first_name) = &self.first_name {
            metadata.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            metadata.last_name = last_name.clone();
        }
    }
}

/// Identity as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: Email,
    pub metadata: UserMetadata,
}

/// Provider-issued session
///
/// Transient: reconstructed from the bearer token on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful sign-up or sign-in at the provider
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: ProviderUser,
    pub session: Session,
}

/// Profile section of an enriched user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub company_id: Option<Uuid>,
}

/// Identity joined with its company, as handed to the routing layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedUser {
    pub id: Uuid,
    pub email: Email,
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl EnrichedUser {
    /// Joins a provider identity with its (optional) company
    pub fn new(user: ProviderUser, company: Option<Company>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            profile: UserProfile {
                first_name: user.metadata.first_name,
                last_name: user.metadata.last_name,
                company_id: user.metadata.company_id,
            },
            company,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
            .trim()
            .to_string()
    }
}

/// Session whose user has been enriched with profile and company
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub session: Session,
    pub user: EnrichedUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_user(company_id: Option<Uuid>) -> ProviderUser {
        ProviderUser {
            id: Uuid::new_v4(),
            email: Email::new("jan@example.com").unwrap(),
            metadata: UserMetadata {
                first_name: "Jan".to_string(),
                last_name: "Kowalski".to_string(),
                company_id,
            },
        }
    }

    #[test]
    fn enriched_user_copies_metadata() {
        let company = Company::new("ABC", None).unwrap();
        let user = provider_user(Some(company.id()));
        let enriched = EnrichedUser::new(user.clone(), Some(company.clone()));

        assert_eq!(enriched.id, user.id);
        assert_eq!(enriched.profile.company_id, Some(company.id()));
        assert_eq!(enriched.company.as_ref().map(Company::name), Some("ABC"));
        assert_eq!(enriched.full_name(), "Jan Kowalski");
    }

    #[test]
    fn missing_company_is_not_serialized() {
        let enriched = EnrichedUser::new(provider_user(None), None);
        let json = serde_json::to_value(&enriched).unwrap();

        assert!(json.get("company").is_none());
        assert!(json["profile"]["company_id"].is_null());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut metadata = provider_user(None).metadata;
        MetadataPatch {
            first_name: Some("Anna".to_string()),
            last_name: None,
        }
        .apply_to(&mut metadata);

        assert_eq!(metadata.first_name, "Anna");
        assert_eq!(metadata.last_name, "Kowalski");
    }
}
