//! # linkup-entity
//!
//! Domain entity models for LinkUp. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow` in addition to `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod account;
pub mod comment;
pub mod notification;
