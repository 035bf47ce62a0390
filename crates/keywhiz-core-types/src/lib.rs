//! Core types shared across the Keywhiz CLI crates
//!
//! - **Auth domains**: the closed set of secrets-service environments
//! - **Platform**: current user name and home directory

pub mod auth_domain;
pub mod platform;

pub use auth_domain::AuthDomain;
pub use platform::{Platform, StaticPlatform, SystemPlatform};
