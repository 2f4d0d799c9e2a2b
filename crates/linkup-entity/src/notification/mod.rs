//! Notification domain entities.

pub mod event;
pub mod model;

pub use event::{Actor, EventKind, NotificationEvent};
pub use model::{NewNotification, Notification};
