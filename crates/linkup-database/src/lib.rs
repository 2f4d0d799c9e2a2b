//! # linkup-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for the LinkUp notification pipeline.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
