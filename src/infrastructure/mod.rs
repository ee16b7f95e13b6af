// Infrastructure layer module
// Contains database adapters and external service integrations
// Follows Hexagonal Architecture

pub mod identity;
pub mod memory;
pub mod repositories;
