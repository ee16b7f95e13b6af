//! Stockdesk API Library
//!
//! Backend for a business-to-business inventory dashboard: company account
//! provisioning, session resolution and product availability listings.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
