// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod auth_event;
pub mod company;
pub mod identity_provider;
pub mod product;
pub mod repositories;
pub mod user;
pub mod validation;
