//! Notification dispatch orchestration.
//!
//! [`NotificationDispatcher::dispatch`] is the single entry point other
//! features call after their primary write succeeds (a comment is posted,
//! a reaction is recorded, a connection request is sent). Delivery is a
//! side effect of that primary action and must never fail it: every error
//! inside the pipeline is caught here, logged, and swallowed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use linkup_core::result::AppResult;
use linkup_core::traits::push::{MulticastMessage, PushProvider};
use linkup_entity::notification::{EventKind, NewNotification, NotificationEvent};

use super::stores::{AccountStore, CommentStore, NotificationStore};
use super::template;

/// Why a dispatch stopped before persisting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The actor and the recipient are the same account.
    SelfNotification,
    /// The recipient account no longer exists.
    RecipientNotFound,
    /// No message body could be rendered for the event.
    NoMessage,
    /// A comment reaction referenced a comment that no longer exists.
    CommentNotFound,
}

/// Why a persisted notification was not pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushSkip {
    /// The recipient has paused push delivery.
    Paused,
    /// The recipient has no registered device tokens.
    NoTokens,
}

/// Outcome of a single dispatch, for logging and tests.
///
/// Callers of [`NotificationDispatcher::dispatch`] never observe it: the
/// public contract is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing was persisted or pushed.
    Skipped(SkipReason),
    /// The record was persisted but push was not attempted.
    Persisted(PushSkip),
    /// The record was persisted and push was attempted for every token.
    Pushed {
        /// Tokens the gateway accepted.
        delivered: usize,
        /// Tokens the gateway rejected.
        failed: usize,
    },
}

/// Orchestrates notification delivery: renders the message, persists the
/// record, and fans the push out over the recipient's device tokens.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    /// Recipient account and preference lookups.
    accounts: Arc<dyn AccountStore>,
    /// Comment lookups for comment-reaction resolution.
    comments: Arc<dyn CommentStore>,
    /// Notification record persistence.
    notifications: Arc<dyn NotificationStore>,
    /// Push delivery transport.
    push: Arc<dyn PushProvider>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        comments: Arc<dyn CommentStore>,
        notifications: Arc<dyn NotificationStore>,
        push: Arc<dyn PushProvider>,
    ) -> Self {
        Self {
            accounts,
            comments,
            notifications,
            push,
        }
    }

    /// Dispatch a notification event. Never returns an error: the caller's
    /// primary action has already succeeded and must not be rolled back
    /// because notification delivery failed.
    pub async fn dispatch(&self, event: NotificationEvent) {
        match self.try_dispatch(&event).await {
            Ok(outcome) => {
                debug!(
                    subject = event.kind.subject(),
                    ?outcome,
                    "Notification dispatched"
                );
            }
            Err(e) => {
                error!(subject = event.kind.subject(), "Notification dispatch failed: {e}");
            }
        }
    }

    /// The dispatch pipeline proper. Precondition failures resolve to
    /// `Ok(Skipped(..))`; store and transport failures propagate as errors
    /// and are caught in [`dispatch`].
    async fn try_dispatch(&self, event: &NotificationEvent) -> AppResult<DispatchOutcome> {
        if event.actor.id == event.recipient {
            return Ok(DispatchOutcome::Skipped(SkipReason::SelfNotification));
        }

        let Some(recipient) = self.accounts.find_by_id(event.recipient).await? else {
            warn!(recipient = %event.recipient, "Notification recipient not found");
            return Ok(DispatchOutcome::Skipped(SkipReason::RecipientNotFound));
        };

        let Some(content) = template::render(&event.kind, &event.actor) else {
            warn!(
                subject = event.kind.subject(),
                "No message could be rendered for event"
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::NoMessage));
        };

        let Some(record) = self.build_record(event, content).await? else {
            return Ok(DispatchOutcome::Skipped(SkipReason::CommentNotFound));
        };

        // Persist before any push attempt. A pause or missing tokens only
        // suppress push delivery, never the in-app record.
        self.notifications.create(&record).await?;

        if let Some(expires_at) = recipient.notification_pause_expires_at {
            if Utc::now() < expires_at {
                return Ok(DispatchOutcome::Persisted(PushSkip::Paused));
            }
            // Lazy expiry: the flag is cleared on the next dispatch after it
            // lapses. A failed clear must not suppress this delivery; the
            // next event will retry it.
            if let Err(e) = self
                .accounts
                .clear_notification_pause(event.recipient)
                .await
            {
                warn!(
                    recipient = %event.recipient,
                    "Failed to clear expired notification pause: {e}"
                );
            }
        }

        if recipient.push_tokens.is_empty() {
            debug!(recipient = %event.recipient, "Recipient has no push tokens");
            return Ok(DispatchOutcome::Persisted(PushSkip::NoTokens));
        }

        let message = MulticastMessage {
            body: record.content.clone(),
            data: HashMap::from([
                ("subject".to_string(), record.subject.clone()),
                ("resource_id".to_string(), event.resource_id.to_string()),
            ]),
            tokens: recipient.push_tokens.clone(),
        };

        let outcome = self.push.send_multicast(&message).await?;
        if outcome.failure_count > 0 {
            let failed = outcome.failed_tokens(&message.tokens);
            warn!(
                recipient = %event.recipient,
                ?failed,
                "Push delivery failed for some tokens"
            );
        }

        Ok(DispatchOutcome::Pushed {
            delivered: message.tokens.len().saturating_sub(outcome.failure_count),
            failed: outcome.failure_count,
        })
    }

    /// Resolve the kind-specific related ids into the record to persist.
    ///
    /// For a comment reaction the parent post is looked up through the
    /// comment; a reaction on a comment that no longer resolves is invalid
    /// as a whole and yields `None` rather than a partially-linked record.
    async fn build_record(
        &self,
        event: &NotificationEvent,
        content: String,
    ) -> AppResult<Option<NewNotification>> {
        let (related_post_id, related_comment_id, related_chat_id) = match &event.kind {
            EventKind::PostReaction { post_id, .. } | EventKind::Comment { post_id } => {
                (Some(post_id.into_uuid()), None, None)
            }
            EventKind::CommentReaction { comment_id, .. } => {
                let Some(comment) = self.comments.find_by_id(*comment_id).await? else {
                    warn!(comment = %comment_id, "Comment for reaction notification not found");
                    return Ok(None);
                };
                (Some(comment.post_id), Some(comment_id.into_uuid()), None)
            }
            EventKind::Message { chat_id } => (None, None, Some(chat_id.into_uuid())),
            _ => (None, None, None),
        };

        Ok(Some(NewNotification {
            from_user: event.actor.id.into_uuid(),
            to_user: event.recipient.into_uuid(),
            subject: event.kind.subject().to_string(),
            content,
            resource_id: event.resource_id,
            related_post_id,
            related_comment_id,
            related_chat_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    use linkup_core::error::AppError;
    use linkup_core::traits::push::{MulticastOutcome, SendResult};
    use linkup_core::types::id::{ChatId, CommentId, PostId, UserId};
    use linkup_entity::account::Account;
    use linkup_entity::comment::Comment;
    use linkup_entity::notification::{Actor, Notification};

    #[derive(Debug, Default)]
    struct FakeAccountStore {
        accounts: Mutex<Vec<Account>>,
        cleared: Mutex<Vec<UserId>>,
        fail_clear: bool,
    }

    #[async_trait]
    impl AccountStore for FakeAccountStore {
        async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id.into_uuid())
                .cloned())
        }

        async fn set_notification_pause(
            &self,
            _id: UserId,
            _until: DateTime<Utc>,
        ) -> AppResult<()> {
            unimplemented!("not used by the dispatcher")
        }

        async fn clear_notification_pause(&self, id: UserId) -> AppResult<()> {
            if self.fail_clear {
                return Err(AppError::database("account store offline"));
            }
            self.cleared.lock().unwrap().push(id);
            let mut accounts = self.accounts.lock().unwrap();
            if let Some(account) = accounts.iter_mut().find(|a| a.id == id.into_uuid()) {
                account.notification_pause_expires_at = None;
            }
            Ok(())
        }

        async fn add_push_token(&self, _id: UserId, _token: &str) -> AppResult<()> {
            unimplemented!("not used by the dispatcher")
        }

        async fn remove_push_token(&self, _id: UserId, _token: &str) -> AppResult<()> {
            unimplemented!("not used by the dispatcher")
        }
    }

    #[derive(Debug, Default)]
    struct FakeCommentStore {
        comments: Mutex<Vec<Comment>>,
    }

    #[async_trait]
    impl CommentStore for FakeCommentStore {
        async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>> {
            Ok(self
                .comments
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id.into_uuid())
                .cloned())
        }
    }

    #[derive(Debug, Default)]
    struct FakeNotificationStore {
        created: Mutex<Vec<NewNotification>>,
    }

    #[async_trait]
    impl NotificationStore for FakeNotificationStore {
        async fn create(&self, data: &NewNotification) -> AppResult<Notification> {
            self.created.lock().unwrap().push(data.clone());
            Ok(Notification {
                id: Uuid::new_v4(),
                from_user: data.from_user,
                to_user: data.to_user,
                subject: data.subject.clone(),
                content: data.content.clone(),
                resource_id: data.resource_id,
                related_post_id: data.related_post_id,
                related_comment_id: data.related_comment_id,
                related_chat_id: data.related_chat_id,
                is_read: false,
                is_deleted: false,
                created_at: Utc::now(),
            })
        }
    }

    #[derive(Debug, Default)]
    struct FakePushProvider {
        sent: Mutex<Vec<MulticastMessage>>,
        fail_tokens: Vec<String>,
        fail_all: bool,
    }

    #[async_trait]
    impl PushProvider for FakePushProvider {
        async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<MulticastOutcome> {
            if self.fail_all {
                return Err(AppError::external_service("push gateway unreachable"));
            }
            self.sent.lock().unwrap().push(message.clone());
            let results: Vec<SendResult> = message
                .tokens
                .iter()
                .map(|token| {
                    let failed = self.fail_tokens.contains(token);
                    SendResult {
                        success: !failed,
                        error: failed.then(|| "NotRegistered".to_string()),
                    }
                })
                .collect();
            let failure_count = results.iter().filter(|r| !r.success).count();
            Ok(MulticastOutcome {
                failure_count,
                results,
            })
        }
    }

    struct Harness {
        accounts: Arc<FakeAccountStore>,
        comments: Arc<FakeCommentStore>,
        notifications: Arc<FakeNotificationStore>,
        push: Arc<FakePushProvider>,
        dispatcher: NotificationDispatcher,
    }

    fn harness_with(accounts: FakeAccountStore, push: FakePushProvider) -> Harness {
        let accounts = Arc::new(accounts);
        let comments = Arc::new(FakeCommentStore::default());
        let notifications = Arc::new(FakeNotificationStore::default());
        let push = Arc::new(push);
        let dispatcher = NotificationDispatcher::new(
            accounts.clone(),
            comments.clone(),
            notifications.clone(),
            push.clone(),
        );
        Harness {
            accounts,
            comments,
            notifications,
            push,
            dispatcher,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeAccountStore::default(), FakePushProvider::default())
    }

    fn account(tokens: &[&str]) -> Account {
        Account {
            id: Uuid::new_v4(),
            first_name: "Recipient".to_string(),
            last_name: "User".to_string(),
            email: None,
            notification_pause_expires_at: None,
            push_tokens: tokens.iter().map(|t| t.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn john() -> Actor {
        Actor {
            id: UserId::new(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
        }
    }

    fn follow_event(actor: Actor, recipient: UserId) -> NotificationEvent {
        NotificationEvent {
            actor,
            recipient,
            resource_id: Uuid::new_v4(),
            kind: EventKind::Follow,
        }
    }

    #[tokio::test]
    async fn test_self_notification_is_suppressed() {
        let h = harness();
        let actor = john();
        let event = follow_event(actor.clone(), actor.id);

        let outcome = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::SelfNotification)
        );
        assert!(h.notifications.created.lock().unwrap().is_empty());
        assert!(h.push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_recipient_creates_nothing() {
        let h = harness();
        let event = follow_event(john(), UserId::new());

        let outcome = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::RecipientNotFound)
        );
        assert!(h.notifications.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_actor_name_creates_nothing() {
        let h = harness();
        let recipient = account(&[]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let actor = Actor {
            id: UserId::new(),
            first_name: String::new(),
            last_name: " ".to_string(),
        };
        let outcome = h
            .dispatcher
            .try_dispatch(&follow_event(actor, recipient_id))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::NoMessage));
        assert!(h.notifications.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_reaction_resolves_parent_post() {
        let h = harness();
        let recipient = account(&[]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let post_id = Uuid::new_v4();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id: recipient_id.into_uuid(),
            body: "nice".to_string(),
            created_at: Utc::now(),
        };
        let comment_id = CommentId::from_uuid(comment.id);
        h.comments.comments.lock().unwrap().push(comment);

        let event = NotificationEvent {
            actor: john(),
            recipient: recipient_id,
            resource_id: Uuid::new_v4(),
            kind: EventKind::CommentReaction {
                comment_id,
                reaction: "love".to_string(),
            },
        };
        h.dispatcher.try_dispatch(&event).await.unwrap();

        let created = h.notifications.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].subject, "impression");
        assert_eq!(created[0].related_post_id, Some(post_id));
        assert_eq!(created[0].related_comment_id, Some(comment_id.into_uuid()));
        assert_eq!(created[0].related_chat_id, None);
    }

    #[tokio::test]
    async fn test_comment_reaction_with_missing_comment_aborts() {
        let h = harness();
        let recipient = account(&["tok1"]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let event = NotificationEvent {
            actor: john(),
            recipient: recipient_id,
            resource_id: Uuid::new_v4(),
            kind: EventKind::CommentReaction {
                comment_id: CommentId::new(),
                reaction: "like".to_string(),
            },
        };
        let outcome = h.dispatcher.try_dispatch(&event).await.unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::CommentNotFound)
        );
        assert!(h.notifications.created.lock().unwrap().is_empty());
        assert!(h.push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_future_pause_persists_without_push() {
        let h = harness();
        let mut recipient = account(&["tok1"]);
        recipient.notification_pause_expires_at = Some(Utc::now() + Duration::hours(2));
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let outcome = h
            .dispatcher
            .try_dispatch(&follow_event(john(), recipient_id))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Persisted(PushSkip::Paused));
        assert_eq!(h.notifications.created.lock().unwrap().len(), 1);
        assert!(h.push.sent.lock().unwrap().is_empty());
        assert!(h.accounts.cleared.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_pause_is_cleared_and_push_proceeds() {
        let h = harness();
        let mut recipient = account(&["tok1"]);
        recipient.notification_pause_expires_at = Some(Utc::now() - Duration::minutes(5));
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let outcome = h
            .dispatcher
            .try_dispatch(&follow_event(john(), recipient_id))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Pushed {
                delivered: 1,
                failed: 0
            }
        );
        assert_eq!(*h.accounts.cleared.lock().unwrap(), vec![recipient_id]);
        assert_eq!(h.push.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_pause_clear_does_not_block_push() {
        let accounts = FakeAccountStore {
            fail_clear: true,
            ..FakeAccountStore::default()
        };
        let h = harness_with(accounts, FakePushProvider::default());
        let mut recipient = account(&["tok1"]);
        recipient.notification_pause_expires_at = Some(Utc::now() - Duration::minutes(5));
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let outcome = h
            .dispatcher
            .try_dispatch(&follow_event(john(), recipient_id))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Pushed {
                delivered: 1,
                failed: 0
            }
        );
        assert_eq!(h.push.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_tokens_short_circuits_push() {
        let h = harness();
        let recipient = account(&[]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let outcome = h
            .dispatcher
            .try_dispatch(&follow_event(john(), recipient_id))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Persisted(PushSkip::NoTokens));
        assert_eq!(h.notifications.created.lock().unwrap().len(), 1);
        assert!(h.push.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_push_failure_is_isolated() {
        let push = FakePushProvider {
            fail_tokens: vec!["tok2".to_string()],
            ..FakePushProvider::default()
        };
        let h = harness_with(FakeAccountStore::default(), push);
        let recipient = account(&["tok1", "tok2"]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let outcome = h
            .dispatcher
            .try_dispatch(&follow_event(john(), recipient_id))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Pushed {
                delivered: 1,
                failed: 1
            }
        );
        let sent = h.push.sent.lock().unwrap();
        assert_eq!(sent[0].tokens, vec!["tok1", "tok2"]);
    }

    #[tokio::test]
    async fn test_push_transport_error_is_swallowed_after_persist() {
        let push = FakePushProvider {
            fail_all: true,
            ..FakePushProvider::default()
        };
        let h = harness_with(FakeAccountStore::default(), push);
        let recipient = account(&["tok1"]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        // The public entry point must not propagate the transport error.
        h.dispatcher
            .dispatch(follow_event(john(), recipient_id))
            .await;

        assert_eq!(h.notifications.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_post_reaction_record_shape() {
        let h = harness();
        let recipient = account(&[]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let actor = john();
        let post_id = PostId::new();
        let event = NotificationEvent {
            actor: actor.clone(),
            recipient: recipient_id,
            resource_id: Uuid::new_v4(),
            kind: EventKind::PostReaction {
                post_id,
                reaction: "like".to_string(),
            },
        };
        h.dispatcher.try_dispatch(&event).await.unwrap();

        let created = h.notifications.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].from_user, actor.id.into_uuid());
        assert_eq!(created[0].to_user, recipient_id.into_uuid());
        assert_eq!(created[0].subject, "impression");
        assert_eq!(created[0].content, "John Doe reacted with like to your post");
        assert_eq!(created[0].related_post_id, Some(post_id.into_uuid()));
    }

    #[tokio::test]
    async fn test_follow_pushes_to_registered_tokens() {
        let h = harness();
        let recipient = account(&["tok1"]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let event = follow_event(john(), recipient_id);
        let resource_id = event.resource_id;
        h.dispatcher.try_dispatch(&event).await.unwrap();

        let created = h.notifications.created.lock().unwrap();
        assert_eq!(created[0].content, "John Doe started following you");

        let sent = h.push.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tokens, vec!["tok1"]);
        assert_eq!(sent[0].body, "John Doe started following you");
        assert_eq!(sent[0].data.get("subject").map(String::as_str), Some("follow"));
        assert_eq!(
            sent[0].data.get("resource_id"),
            Some(&resource_id.to_string())
        );
    }

    #[tokio::test]
    async fn test_message_event_records_chat_id() {
        let h = harness();
        let recipient = account(&[]);
        let recipient_id = UserId::from_uuid(recipient.id);
        h.accounts.accounts.lock().unwrap().push(recipient);

        let chat_id = ChatId::new();
        let event = NotificationEvent {
            actor: john(),
            recipient: recipient_id,
            resource_id: Uuid::new_v4(),
            kind: EventKind::Message { chat_id },
        };
        h.dispatcher.try_dispatch(&event).await.unwrap();

        let created = h.notifications.created.lock().unwrap();
        assert_eq!(created[0].subject, "message");
        assert_eq!(created[0].related_chat_id, Some(chat_id.into_uuid()));
        assert_eq!(created[0].related_post_id, None);
    }
}
