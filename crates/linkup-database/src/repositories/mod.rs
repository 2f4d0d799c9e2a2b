//! Repository implementations for the notification pipeline entities.

pub mod account;
pub mod comment;
pub mod notification;

pub use account::AccountRepository;
pub use comment::CommentRepository;
pub use notification::NotificationRepository;
