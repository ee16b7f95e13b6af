// Company domain module

#![allow(clippy::module_inception)]

pub mod company;

pub use company::{Company, CompanyUpdate};
