//! Services layer for the identity service.
//!
//! Business logic for credential and session lifecycle management,
//! plus the persistence trait and its implementations.

mod auth;
mod database;
pub mod error;
mod jwt;
mod store;

pub use auth::AuthService;
pub use database::Database;
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, AccessTokenSigner, JwtService};
pub use store::{AuthStore, MemoryStore};
