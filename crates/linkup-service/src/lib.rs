//! # linkup-service
//!
//! Business logic service layer for the LinkUp notification pipeline.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references, so every collaborator can be
//! substituted with an in-memory fake in tests.

pub mod notification;

pub use notification::{NotificationDispatcher, NotificationService, PreferenceService};
