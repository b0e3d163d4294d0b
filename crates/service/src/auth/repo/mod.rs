//! Durable `CredentialStore` implementations.

pub mod json;
pub mod seaorm;
