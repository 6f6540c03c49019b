use std::fmt;

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

use crate::error::Result;

/// Identifier the platform assigns to a delivered message.
pub type MessageId = String;

/// Content of a reply.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyPayload {
    Text { text: String },
    /// Base64-encoded image, as produced by the rendering engine.
    Image { base64: String },
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(base64: impl Into<String>) -> Self {
        Self::Image {
            base64: base64.into(),
        }
    }
}

// Images can be megabytes of base64; keep them out of logs.
impl fmt::Debug for ReplyPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            Self::Image { base64 } => f
                .debug_struct("Image")
                .field("base64_len", &base64.len())
                .finish(),
        }
    }
}

/// Where an event came from, and therefore where replies go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub channel_type: String,
    pub account_id: String,
    /// Group or private chat ID.
    pub chat_id: String,
}

/// Capability to answer the event that is currently being handled.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Deliver `payload` to the originating conversation.
    ///
    /// Returns the platform message ID when the adapter knows it.
    async fn send(&self, payload: ReplyPayload) -> Result<Option<MessageId>>;
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::sync::Mutex};

    #[derive(Default)]
    struct Collecting {
        sent: Mutex<Vec<ReplyPayload>>,
    }

    #[async_trait]
    impl ReplyChannel for Collecting {
        async fn send(&self, payload: ReplyPayload) -> Result<Option<MessageId>> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(payload);
            Ok(Some(format!("msg-{}", sent.len())))
        }
    }

    #[test]
    fn debug_hides_image_bytes() {
        let payload = ReplyPayload::image("A".repeat(4096));
        let rendered = format!("{payload:?}");
        assert_eq!(rendered, "Image { base64_len: 4096 }");
    }

    #[test]
    fn payload_serializes_with_kind_tag() {
        let json = serde_json::to_value(ReplyPayload::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "text", "text": "hi"}));
    }

    #[tokio::test]
    async fn channel_is_object_safe() {
        let channel: Box<dyn ReplyChannel> = Box::<Collecting>::default();
        let id = channel.send(ReplyPayload::text("one")).await.unwrap();
        assert_eq!(id.as_deref(), Some("msg-1"));
    }
}
