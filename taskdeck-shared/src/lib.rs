//! # TaskDeck Shared Library
//!
//! This crate contains the data layer and authentication primitives shared by
//! the TaskDeck API server and its integration tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks, subtasks) and their CRUD operations
//! - `auth`: Password hashing, JWT issuance/validation, and the request auth context
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
