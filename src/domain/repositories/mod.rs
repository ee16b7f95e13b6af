// Repository traits (ports)
// Infrastructure adapters implement these; services depend only on the traits

pub mod auth_event_repository;
pub mod company_repository;
pub mod product_repository;
pub mod session_repository;
pub mod user_repository;

pub use auth_event_repository::AuthEventSink;
pub use company_repository::CompanyRepository;
pub use product_repository::ProductRepository;
pub use session_repository::{SessionRecord, SessionRepository};
pub use user_repository::{User, UserRepository};
