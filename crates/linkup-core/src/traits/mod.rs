//! Core traits defined in `linkup-core` and implemented by other crates.

pub mod push;

pub use push::{MulticastMessage, MulticastOutcome, PushProvider, SendResult};
