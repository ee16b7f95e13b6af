use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of authentication event recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthEventType {
    Login,
    Registration,
    Logout,
}

impl AuthEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEventType::Login => "login",
            AuthEventType::Registration => "registration",
            AuthEventType::Logout => "logout",
        }
    }
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(AuthEventType::Login),
            "registration" => Ok(AuthEventType::Registration),
            "logout" => Ok(AuthEventType::Logout),
            other => Err(format!("Unknown auth event type: {}", other)),
        }
    }
}

/// Append-only audit record of an authentication event
///
/// Events are written best-effort: a failed append is logged by the caller
/// and never fails the operation that produced it.
///
/// # Example
/// ```
/// use stockdesk_api::domain::auth_event::{AuthEvent, AuthEventType};
/// use serde_json::json;
/// use uuid::Uuid;
///
/// let event = AuthEvent::new(Uuid::new_v4(), AuthEventType::Login, json!({ "email": "a@b.com" }));
/// assert!(!event.processed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: AuthEventType,
    pub event_data: Value,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

impl AuthEvent {
    /// Creates an unprocessed event stamped with the current time
    pub fn new(user_id: Uuid, event_type: AuthEventType, event_data: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event_type,
            event_data,
            processed: false,
            created_at: Utc::now(),
        }
    }
}
