//! # LMS Shared Library
//!
//! Persistence, authentication and authorization code shared by the LMS
//! API server and its integration tests.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and embedded schema migrations
//! - `models`: One module per table with its CRUD queries
//! - `auth`: Password hashing, JWT validation, bearer extraction and
//!   permission checks

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the LMS shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
