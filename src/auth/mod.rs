// Credential primitives used by the local identity provider

pub mod jwt;
pub mod password;
