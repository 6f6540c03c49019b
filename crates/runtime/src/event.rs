//! The inbound event a runtime is attached to.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use herald_channels::{MessageId, ReplyChannel, ReplyPayload, ReplyTarget};

/// The identity bound to the sender of an event, as looked up by the
/// dispatcher from the originating message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUser {
    /// Platform-side sender ID (QQ number, Telegram user ID, ...).
    pub user_id: String,
    /// Game UID bound to the sender, if any.
    pub uid: Option<String>,
    pub has_credential: bool,
}

/// One inbound event. Created by the dispatcher, shared with the runtime.
pub struct EventContext {
    event_id: String,
    target: ReplyTarget,
    user: Option<EventUser>,
    reply: Arc<dyn ReplyChannel>,
    /// Guidance already sent this event.
    guidance_sent: AtomicBool,
}

impl EventContext {
    pub fn new(target: ReplyTarget, reply: Arc<dyn ReplyChannel>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            target,
            user: None,
            reply,
            guidance_sent: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: EventUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn target(&self) -> &ReplyTarget {
        &self.target
    }

    pub fn user(&self) -> Option<&EventUser> {
        self.user.as_ref()
    }

    pub fn reply_channel(&self) -> &dyn ReplyChannel {
        self.reply.as_ref()
    }

    pub async fn reply(&self, payload: ReplyPayload) -> herald_channels::Result<Option<MessageId>> {
        self.reply.send(payload).await
    }

    /// Claim the one guidance prompt this event may send.
    ///
    /// Returns `true` for exactly one caller; every later call sees `false`.
    pub fn claim_guidance(&self) -> bool {
        !self.guidance_sent.swap(true, Ordering::AcqRel)
    }

    pub fn guidance_sent(&self) -> bool {
        self.guidance_sent.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for EventContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventContext")
            .field("event_id", &self.event_id)
            .field("target", &self.target)
            .field("user", &self.user)
            .field("guidance_sent", &self.guidance_sent())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, async_trait::async_trait};

    struct Silent;

    #[async_trait]
    impl ReplyChannel for Silent {
        async fn send(&self, _payload: ReplyPayload) -> herald_channels::Result<Option<MessageId>> {
            Ok(None)
        }
    }

    fn target() -> ReplyTarget {
        ReplyTarget {
            channel_type: "qq".into(),
            account_id: "bot".into(),
            chat_id: "group-1".into(),
        }
    }

    #[test]
    fn guidance_can_be_claimed_once() {
        let event = EventContext::new(target(), Arc::new(Silent));
        assert!(!event.guidance_sent());
        assert!(event.claim_guidance());
        assert!(!event.claim_guidance());
        assert!(event.guidance_sent());
    }

    #[test]
    fn events_get_distinct_ids() {
        let a = EventContext::new(target(), Arc::new(Silent));
        let b = EventContext::new(target(), Arc::new(Silent));
        assert_ne!(a.event_id(), b.event_id());
        assert!(a.user().is_none());
    }
}
