// Password hashing utilities
// Uses bcrypt; the cost is configurable so tests can run at the minimum

pub use bcrypt::DEFAULT_COST;

/// Hashes a password using bcrypt at the given cost
///
/// # Example
/// ```
/// use stockdesk_api::auth::password::hash_password;
///
/// let hash = hash_password("my_password", 4).expect("valid hash");
/// assert!(hash.starts_with("$2"));
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    bcrypt::hash(password, cost).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    bcrypt::verify(password, hash).map_err(|e| e.to_string())
}
