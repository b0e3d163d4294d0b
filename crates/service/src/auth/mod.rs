//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration and login live here; transport is someone else's problem.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
