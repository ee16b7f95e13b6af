// In-memory adapters
// Used by the test suite and by the server when no database is configured

pub mod auth_event_sink;
pub mod company_repository;
pub mod product_repository;
pub mod session_repository;
pub mod user_repository;

pub use auth_event_sink::InMemoryAuthEventSink;
pub use company_repository::InMemoryCompanyRepository;
pub use product_repository::InMemoryProductRepository;
pub use session_repository::InMemorySessionRepository;
pub use user_repository::InMemoryUserRepository;
