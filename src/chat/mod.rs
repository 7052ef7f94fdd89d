pub mod responder;
pub mod service;

pub use responder::{REPLY_PHRASES, Responder};
pub use service::{ChatService, ReplyHandle};

use crate::common::Message;

/// Number of peer messages the user has not seen yet. Recomputed from
/// the log on every read; no counter is kept that could drift.
pub fn unread_count(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.received && !m.read).count()
}
