//! HTTP handlers for the identity service.

pub mod auth;
pub mod user;

pub use auth::*;
pub use user::*;
