// Identity provider adapters

pub mod local_provider;

pub use local_provider::{IdentitySettings, LocalIdentityProvider};
