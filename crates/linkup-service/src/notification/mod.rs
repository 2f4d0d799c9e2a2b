//! Notification templates, dispatch orchestration, preferences, and feed queries.

pub mod dispatcher;
pub mod preferences;
pub mod service;
pub mod stores;
pub mod template;

pub use dispatcher::{DispatchOutcome, NotificationDispatcher, PushSkip, SkipReason};
pub use preferences::PreferenceService;
pub use service::NotificationService;
pub use stores::{AccountStore, CommentStore, NotificationStore};
