//! # linkup-core
//!
//! Core crate for the LinkUp notification pipeline. Contains traits,
//! configuration schemas, typed identifiers, pagination types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other LinkUp crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
