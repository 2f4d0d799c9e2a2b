//! # linkup-push
//!
//! Push delivery transport for LinkUp. Implements the
//! [`PushProvider`](linkup_core::traits::push::PushProvider) trait over the
//! FCM multicast HTTP API.

pub mod fcm;

pub use fcm::FcmPushProvider;
