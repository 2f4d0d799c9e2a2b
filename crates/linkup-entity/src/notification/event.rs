//! Transient notification event types.
//!
//! A [`NotificationEvent`] is constructed by the feature that performed the
//! triggering action (a reaction, a comment, a connection request) and
//! consumed synchronously by the dispatcher. It is never stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use linkup_core::types::id::{ChatId, CommentId, PostId, UserId};

/// The user who triggered an event. The name fields feed the rendered
/// message text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Acting account id.
    pub id: UserId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

impl Actor {
    /// The actor's human-readable display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// The category of user action that triggered a notification, together
/// with its kind-specific payload.
///
/// Each variant carries exactly the references that kind needs, so an
/// event can never pair a kind with the wrong resource shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Someone reacted to the recipient's post.
    PostReaction {
        /// The reacted-to post.
        post_id: PostId,
        /// Reaction kind string, e.g. `"like"` or `"love"`.
        reaction: String,
    },
    /// Someone reacted to the recipient's comment.
    CommentReaction {
        /// The reacted-to comment. The parent post is resolved at dispatch.
        comment_id: CommentId,
        /// Reaction kind string.
        reaction: String,
    },
    /// Someone commented on the recipient's post.
    Comment {
        /// The commented-on post.
        post_id: PostId,
    },
    /// Someone started following the recipient.
    Follow,
    /// Someone sent the recipient a chat message.
    Message {
        /// The chat conversation.
        chat_id: ChatId,
    },
    /// Someone mentioned the recipient in a post.
    Mention,
    /// Someone tagged the recipient in a post.
    Tag,
    /// Someone reposted the recipient's post.
    Repost,
    /// Someone shared the recipient's post.
    Share,
    /// Someone the recipient follows published a post.
    Post,
    /// Someone sent the recipient a connection request.
    ConnectionRequest,
    /// Someone accepted the recipient's connection request.
    ConnectionAccepted,
    /// Someone rejected the recipient's connection request.
    ConnectionRejected,
}

impl EventKind {
    /// The subject string persisted on the notification record and echoed
    /// in the push data payload. Both reaction variants share `"impression"`.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::PostReaction { .. } | Self::CommentReaction { .. } => "impression",
            Self::Comment { .. } => "comment",
            Self::Follow => "follow",
            Self::Message { .. } => "message",
            Self::Mention => "mention",
            Self::Tag => "tag",
            Self::Repost => "repost",
            Self::Share => "share",
            Self::Post => "post",
            Self::ConnectionRequest => "connection_request",
            Self::ConnectionAccepted => "connection_accepted",
            Self::ConnectionRejected => "connection_rejected",
        }
    }
}

/// A notification-worthy event, consumed synchronously by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Who triggered the event.
    pub actor: Actor,
    /// Who should be notified.
    pub recipient: UserId,
    /// Opaque id of the triggering entity (the reaction, comment, request,
    /// etc.), echoed in the push data payload.
    pub resource_id: Uuid,
    /// What happened.
    pub kind: EventKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_subjects_collapse_to_impression() {
        let on_post = EventKind::PostReaction {
            post_id: PostId::new(),
            reaction: "like".to_string(),
        };
        let on_comment = EventKind::CommentReaction {
            comment_id: CommentId::new(),
            reaction: "love".to_string(),
        };
        assert_eq!(on_post.subject(), "impression");
        assert_eq!(on_comment.subject(), "impression");
    }

    #[test]
    fn test_display_name_trims_whitespace() {
        let actor = Actor {
            id: UserId::new(),
            first_name: " John ".to_string(),
            last_name: "Doe".to_string(),
        };
        assert_eq!(actor.display_name(), "John Doe");
    }

    #[test]
    fn test_display_name_empty_for_blank_names() {
        let actor = Actor {
            id: UserId::new(),
            first_name: "  ".to_string(),
            last_name: String::new(),
        };
        assert!(actor.display_name().is_empty());
    }
}
