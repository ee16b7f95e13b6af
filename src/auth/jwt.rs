// Session token creation and verification
// Tokens are HS256 JWTs naming the user and the server-side session record

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `sid` - Session record ID, checked for revocation
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Session ID
    pub sid: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

impl Claims {
    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp as i64, 0)
            .single()
            .unwrap_or_default()
    }
}

/// Creates a session token
///
/// # Arguments
/// * `user_id` - The user's ID to include in the token
/// * `session_id` - The server-side session the token belongs to
/// * `expires_at` - When the token stops being accepted
/// * `secret` - The secret key for signing
///
/// # Example
/// ```
/// use stockdesk_api::auth::jwt::create_token;
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
///
/// let expires_at = Utc::now() + Duration::hours(8);
/// let token = create_token(Uuid::new_v4(), Uuid::new_v4(), expires_at, "secret")
///     .expect("valid token");
/// assert!(!token.is_empty());
/// ```
pub fn create_token(
    user_id: Uuid,
    session_id: Uuid,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String, String> {
    let claims = Claims {
        sub: user_id,
        sid: session_id,
        exp: expires_at.timestamp().max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a session token
///
/// Rejects bad signatures and expired tokens.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
