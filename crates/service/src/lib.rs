//! Service layer for user registration and login.
//! - Business rules live in `auth::AuthService`, independent of any web framework.
//! - Persistence sits behind the `auth::repository::CredentialStore` trait.

pub mod errors;
pub mod auth;
pub mod storage;
