pub mod password;
pub mod token;
pub mod validation;

pub use password::{hash_password, verify_password, Password, PasswordHashString};
pub use token::{
    compose_refresh_token, fingerprint, parse_refresh_token, random_secret, REFRESH_SECRET_BYTES,
};
pub use validation::ValidatedJson;
