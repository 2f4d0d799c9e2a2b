//! Message template table.
//!
//! Pure function from event kind and actor to the rendered notification
//! body. The match over [`EventKind`] is exhaustive, so adding a kind
//! without a template is a compile error rather than a runtime fallback.

use linkup_entity::notification::{Actor, EventKind};

/// Render the human-readable body for an event.
///
/// Returns `None` when a required field is blank (actor name, reaction
/// kind). The dispatcher treats that as a hard stop: no record is created
/// and no push is sent, so a malformed event is dropped rather than
/// surfaced as a failure of the action that triggered it.
pub fn render(kind: &EventKind, actor: &Actor) -> Option<String> {
    let name = actor.display_name();
    if name.is_empty() {
        return None;
    }

    let body = match kind {
        EventKind::PostReaction { reaction, .. } => {
            let reaction = reaction.trim();
            if reaction.is_empty() {
                return None;
            }
            format!("{name} reacted with {reaction} to your post")
        }
        EventKind::CommentReaction { reaction, .. } => {
            let reaction = reaction.trim();
            if reaction.is_empty() {
                return None;
            }
            format!("{name} reacted with {reaction} to your comment")
        }
        EventKind::Comment { .. } => format!("{name} commented on your post"),
        EventKind::Follow => format!("{name} started following you"),
        EventKind::Message { .. } => format!("{name} sent you a message"),
        EventKind::Mention => format!("{name} mentioned you in a post"),
        EventKind::Tag => format!("{name} tagged you in a post"),
        EventKind::Repost => format!("{name} reposted your post"),
        EventKind::Share => format!("{name} shared your post"),
        EventKind::Post => format!("{name} published a new post"),
        EventKind::ConnectionRequest => format!("{name} sent you a connection request"),
        EventKind::ConnectionAccepted => format!("{name} accepted your connection request"),
        EventKind::ConnectionRejected => format!("{name} rejected your connection request"),
    };

    Some(body)
}
