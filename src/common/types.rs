use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender label for messages written by the local user.
pub const SELF_SENDER: &str = "You";

/// Domain model for one chat line.
///
/// `received` is true when the message originated from the simulated
/// peer; `read` starts false for those and flips once the user opens
/// the panel. Outbound messages are read from the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub time: String,
    pub received: bool,
    pub read: bool,
}

impl Message {
    /// Message typed by the local user.
    pub fn outbound(text: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            sender: SELF_SENDER.to_string(),
            text: text.into(),
            time: clock_time(),
            received: false,
            read: true,
        }
    }

    /// Message arriving from the simulated peer.
    pub fn inbound(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            sender: sender.into(),
            text: text.into(),
            time: clock_time(),
            received: true,
            read: false,
        }
    }
}

// UUIDv7: unique and time-ordered, so ids follow creation order.
fn next_id() -> String {
    Uuid::now_v7().to_string()
}

fn clock_time() -> String {
    Local::now().format("%H:%M").to_string()
}
