pub mod session;
pub mod user;

pub use session::{Session, SessionMeta};
pub use user::{TokenResponse, User, UserResponse};
