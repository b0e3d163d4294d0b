//! Storage helpers for the service layer
//!
//! File-backed stores for deployments where a database is overkill.

pub mod json_map_store;
