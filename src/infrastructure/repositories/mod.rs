// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_auth_event_repository;
pub mod postgres_company_repository;
pub mod postgres_product_repository;
pub mod postgres_session_repository;
pub mod postgres_user_repository;

pub use postgres_auth_event_repository::PostgresAuthEventSink;
pub use postgres_company_repository::PostgresCompanyRepository;
pub use postgres_product_repository::PostgresProductRepository;
pub use postgres_session_repository::PostgresSessionRepository;
pub use postgres_user_repository::PostgresUserRepository;
