use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stockdesk_api::api::{router, AppState};
use stockdesk_api::config::AppConfig;
use stockdesk_api::domain::repositories::{
    AuthEventSink, CompanyRepository, ProductRepository, SessionRepository, UserRepository,
};
use stockdesk_api::infrastructure::identity::{IdentitySettings, LocalIdentityProvider};
use stockdesk_api::infrastructure::memory::{
    InMemoryAuthEventSink, InMemoryCompanyRepository, InMemoryProductRepository,
    InMemorySessionRepository, InMemoryUserRepository,
};
use stockdesk_api::infrastructure::repositories::{
    PostgresAuthEventSink, PostgresCompanyRepository, PostgresProductRepository,
    PostgresSessionRepository, PostgresUserRepository,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let state = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Database connected successfully");

            build_state(
                &config,
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresSessionRepository::new(pool.clone())),
                AppStateParts {
                    companies: Arc::new(PostgresCompanyRepository::new(pool.clone())),
                    products: Arc::new(product_repository(pool.clone()).await),
                    events: Arc::new(PostgresAuthEventSink::new(pool)),
                },
            )
        }
        None => build_state(
            &config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            AppStateParts {
                companies: Arc::new(InMemoryCompanyRepository::new()),
                products: Arc::new(InMemoryProductRepository::new()),
                events: Arc::new(InMemoryAuthEventSink::new()),
            },
        ),
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}

/// Product store with its change relay running; the relay is best effort
async fn product_repository(pool: sqlx::PgPool) -> PostgresProductRepository {
    let products = PostgresProductRepository::new(pool);
    if let Err(e) = products.listen_for_changes().await {
        tracing::error!(error = %e, "Product change notifications disabled");
    }
    products
}

struct AppStateParts {
    companies: Arc<dyn CompanyRepository>,
    products: Arc<dyn ProductRepository>,
    events: Arc<dyn AuthEventSink>,
}

fn build_state(
    config: &AppConfig,
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    parts: AppStateParts,
) -> AppState {
    let identity = LocalIdentityProvider::new(
        users,
        sessions,
        IdentitySettings {
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: config.session_ttl,
            password_cost: config.bcrypt_cost,
        },
    );

    AppState::new(
        Arc::new(identity),
        parts.companies,
        parts.products,
        parts.events,
    )
}
