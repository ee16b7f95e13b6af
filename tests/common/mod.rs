//! Shared fixtures for integration tests
//!
//! Wires the services over in-memory adapters, with wrappers that can be
//! switched to fail individual data store operations.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use stockdesk_api::api::AppState;
use stockdesk_api::domain::auth_event::AuthEvent;
use stockdesk_api::domain::company::{Company, CompanyUpdate};
use stockdesk_api::domain::product::Product;
use stockdesk_api::domain::repositories::{
    AuthEventSink, CompanyRepository, SessionRecord, SessionRepository,
};
use stockdesk_api::infrastructure::identity::{IdentitySettings, LocalIdentityProvider};
use stockdesk_api::infrastructure::memory::{
    InMemoryAuthEventSink, InMemoryCompanyRepository, InMemoryProductRepository,
    InMemorySessionRepository, InMemoryUserRepository,
};
use stockdesk_api::services::forms::{NewAccount, SignInData, SignUpData};
use stockdesk_api::services::AuthService;

pub const TEST_SECRET: &str = "integration-test-secret";

/// CompanyRepository whose operations can be made to fail
#[derive(Default)]
pub struct FlakyCompanyRepository {
    inner: InMemoryCompanyRepository,
    pub fail_insert: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl FlakyCompanyRepository {
    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

fn failing(flag: &AtomicBool, op: &str) -> Result<(), String> {
    if flag.load(Ordering::SeqCst) {
        Err(format!("simulated {} failure", op))
    } else {
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for FlakyCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<Company, String> {
        failing(&self.fail_insert, "insert")?;
        self.inner.insert(company).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Company>, String> {
        failing(&self.fail_get, "get")?;
        self.inner.get(id).await
    }

    async fn update(&self, id: Uuid, update: &CompanyUpdate) -> Result<(), String> {
        failing(&self.fail_update, "update")?;
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        failing(&self.fail_delete, "delete")?;
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Company>, String> {
        self.inner.list().await
    }
}

/// Audit sink that always fails
pub struct BrokenAuthEventSink;

#[async_trait]
impl AuthEventSink for BrokenAuthEventSink {
    async fn append(&self, _event: &AuthEvent) -> Result<(), String> {
        Err("audit table unavailable".to_string())
    }
}

/// Session store that refuses to open sessions
#[derive(Default)]
pub struct FailingSessionRepository {
    inner: InMemorySessionRepository,
}

#[async_trait]
impl SessionRepository for FailingSessionRepository {
    async fn create(&self, _session: SessionRecord) -> Result<(), String> {
        Err("session table unavailable".to_string())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, String> {
        self.inner.find_by_id(id).await
    }

    async fn revoke(&self, id: Uuid) -> Result<(), String> {
        self.inner.revoke(id).await
    }
}

pub struct Harness {
    pub auth: AuthService,
    pub users: Arc<InMemoryUserRepository>,
    pub companies: Arc<FlakyCompanyRepository>,
    pub events: Arc<InMemoryAuthEventSink>,
    pub products: Arc<InMemoryProductRepository>,
    pub identity: Arc<LocalIdentityProvider>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self::build(Arc::new(InMemorySessionRepository::new()), products)
    }

    /// Wiring whose identity provider cannot open sessions
    pub fn with_failing_sessions() -> Self {
        Self::build(Arc::new(FailingSessionRepository::default()), Vec::new())
    }

    fn build(sessions: Arc<dyn SessionRepository>, products: Vec<Product>) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let identity = Arc::new(identity_provider(users.clone(), sessions));
        let companies = Arc::new(FlakyCompanyRepository::default());
        let events = Arc::new(InMemoryAuthEventSink::new());
        let products = Arc::new(InMemoryProductRepository::with_products(products));

        let auth = AuthService::new(identity.clone(), companies.clone(), events.clone());

        Self {
            auth,
            users,
            companies,
            events,
            products,
            identity,
        }
    }

    /// Same wiring but with an audit sink that always fails
    pub fn with_broken_audit() -> Self {
        let harness = Self::new();
        let auth = AuthService::new(
            harness.identity.clone(),
            harness.companies.clone(),
            Arc::new(BrokenAuthEventSink),
        );
        Self { auth, ..harness }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.identity.clone(),
            self.companies.clone(),
            self.products.clone(),
            self.events.clone(),
        )
    }

    pub async fn company_names(&self) -> Vec<String> {
        self.companies
            .list()
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }
}

pub fn identity_provider(
    users: Arc<InMemoryUserRepository>,
    sessions: Arc<dyn SessionRepository>,
) -> LocalIdentityProvider {
    LocalIdentityProvider::new(
        users,
        sessions,
        IdentitySettings {
            jwt_secret: TEST_SECRET.to_string(),
            session_ttl: Duration::hours(1),
            password_cost: 4,
        },
    )
}

pub fn sign_up_data(email: &str, company_name: &str) -> SignUpData {
    SignUpData {
        email: email.to_string(),
        password: "secret1".to_string(),
        first_name: "Jan".to_string(),
        last_name: "Kowalski".to_string(),
        company_name: company_name.to_string(),
        company_address: None,
    }
}

pub fn new_account(email: &str, company_name: &str) -> NewAccount {
    sign_up_data(email, company_name)
        .validate()
        .expect("valid sign up data")
}

pub fn sign_in_data(email: &str, password: &str) -> SignInData {
    SignInData {
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// `count` products named `Product 00`, `Product 01`, ...
pub fn numbered_products(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            Product::new(format!("SKU-{:02}", i), format!("Product {:02}", i), (i * 3) as u32)
                .expect("valid product")
        })
        .collect()
}
