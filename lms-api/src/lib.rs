//! # LMS API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Layered configuration
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating JSON and query extractors
//! - `pagination`: Page query and page envelope
//! - `routes`: API route handlers
//! - `views`: Response shapes with nested entities

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod routes;
pub mod views;
