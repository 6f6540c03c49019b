//! Reply delivery for inbound events.
//!
//! Each adapter (QQ, Telegram, console, ...) implements [`ReplyChannel`] for
//! the conversation an event arrived on. The runtime only ever talks to that
//! trait.

pub mod error;
pub mod reply;

pub use {
    error::{Error, Result},
    reply::{MessageId, ReplyChannel, ReplyPayload, ReplyTarget},
};
