// User domain module
// Identities, their profile metadata and provider sessions

pub mod profile;
pub mod value_objects;

pub use profile::{
    AuthGrant, AuthSession, EnrichedUser, MetadataPatch, ProviderUser, Session, UserMetadata,
    UserProfile,
};
pub use value_objects::Email;
