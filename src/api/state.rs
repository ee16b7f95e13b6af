use std::sync::Arc;

use crate::domain::identity_provider::IdentityProvider;
use crate::domain::repositories::{AuthEventSink, CompanyRepository, ProductRepository};
use crate::services::{AuthService, ProductService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub products: ProductService,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        companies: Arc<dyn CompanyRepository>,
        products: Arc<dyn ProductRepository>,
        events: Arc<dyn AuthEventSink>,
    ) -> Self {
        Self {
            auth: AuthService::new(identity, companies, events),
            products: ProductService::new(products),
        }
    }
}
