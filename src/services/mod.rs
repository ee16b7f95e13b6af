// Application services
// Orchestrate domain objects and ports; no HTTP or SQL knowledge here

pub mod auth_service;
pub mod errors;
pub mod forms;
pub mod product_service;
pub mod session_resolver;
pub mod subscription;

pub use auth_service::AuthService;
pub use errors::{AuthError, AuthResult, ProductError, ProductResult};
pub use product_service::{Page, ProductService};
pub use session_resolver::{AuthStateChange, SessionResolver};
pub use subscription::Subscription;
