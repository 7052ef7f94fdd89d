use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::common::{Message, lock};
use crate::storage::{SharedSlots, slots};

use super::responder::Responder;
use super::unread_count;

/// Handle for one pending simulated reply. Dropping it detaches the
/// task and the reply still lands; `abort` cancels it.
pub struct ReplyHandle {
    task: JoinHandle<()>,
}

impl ReplyHandle {
    /// Wait until the reply has been appended (or the task aborted).
    pub async fn wait(self) {
        let _ = self.task.await;
    }

    /// Cancel the pending reply.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Single access point for the chat panel: the message log, its
/// unread derivation and the simulated peer. The log is owned here;
/// everything else sees snapshots. The store it persists to is passed
/// in at construction.
#[derive(Clone)]
pub struct ChatService {
    inner: Arc<ChatInner>,
}

struct ChatInner {
    store: SharedSlots,
    log: Mutex<Vec<Message>>,
    responder: Responder,
}

impl ChatService {
    /// Restore the log from the `chat_messages` slot and wire the
    /// simulated responder.
    pub fn new(store: SharedSlots, responder: Responder) -> Self {
        let restored: Vec<Message> = lock(&store).load(slots::CHAT_MESSAGES);
        Self {
            inner: Arc::new(ChatInner {
                store,
                log: Mutex::new(restored),
                responder,
            }),
        }
    }

    /// Snapshot of the log, insertion order.
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.inner.log).clone()
    }

    /// Count of peer messages not yet seen.
    pub fn unread_count(&self) -> usize {
        unread_count(&lock(&self.inner.log))
    }

    /// Append the user's message and schedule one simulated reply
    /// after a randomized delay. The outbound message is in the log
    /// before this returns. Each call arms its own timer; pending
    /// replies are independent, uncapped and never debounced.
    pub fn send_message(&self, text: &str) -> ReplyHandle {
        self.append(Message::outbound(text));

        let inner = Arc::clone(&self.inner);
        let delay = inner.responder.sample_delay();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            let reply = inner.responder.reply();
            let mut guard = lock(&inner.log);
            guard.push(reply);
            persist(&inner.store, &guard);
        });

        ReplyHandle { task }
    }

    /// Flag every peer message as seen. Outbound messages keep their
    /// flags. Idempotent.
    pub fn mark_all_as_read(&self) {
        let mut guard = lock(&self.inner.log);
        for msg in guard.iter_mut().filter(|m| m.received) {
            msg.read = true;
        }
        persist(&self.inner.store, &guard);
    }

    fn append(&self, message: Message) {
        let mut guard = lock(&self.inner.log);
        guard.push(message);
        persist(&self.inner.store, &guard);
    }
}

/// Wholesale write of the log. The in-memory log stays authoritative
/// when the write fails; the failure is only logged.
fn persist(store: &SharedSlots, messages: &[Message]) {
    if let Err(err) = lock(store).save(slots::CHAT_MESSAGES, messages) {
        log::warn!("Failed to persist chat log: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::REPLY_PHRASES;
    use crate::common::SELF_SENDER;
    use crate::storage::{self, SlotStore};

    fn fast_service() -> ChatService {
        let store = storage::shared(SlotStore::in_memory().unwrap());
        ChatService::new(store, Responder::new("Cazé tv", 1, 5))
    }

    #[tokio::test]
    async fn test_outbound_visible_before_send_returns() {
        let chat = fast_service();
        let _pending = chat.send_message("Oi");

        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, SELF_SENDER);
        assert_eq!(messages[0].text, "Oi");
        assert!(messages[0].read);
        assert!(!messages[0].received);
        assert_eq!(chat.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_reply_arrives_with_fixed_phrase() {
        let chat = fast_service();
        chat.send_message("Oi").wait().await;

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        let reply = &messages[1];
        assert!(reply.received);
        assert!(!reply.read);
        assert_eq!(reply.sender, "Cazé tv");
        assert!(REPLY_PHRASES.contains(&reply.text.as_str()));
        assert_eq!(chat.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_every_send_gets_exactly_one_reply() {
        let chat = fast_service();
        let pending: Vec<_> = (0..5)
            .map(|i| chat.send_message(&format!("mensagem {i}")))
            .collect();
        for handle in pending {
            handle.wait().await;
        }
        assert_eq!(chat.messages().len(), 10);
    }

    #[tokio::test]
    async fn test_mark_all_as_read_leaves_outbound_untouched() {
        let chat = fast_service();
        chat.send_message("Oi").wait().await;

        chat.mark_all_as_read();
        let messages = chat.messages();
        assert!(messages.iter().all(|m| m.read));
        assert!(messages[0].read && !messages[0].received);
        assert_eq!(chat.unread_count(), 0);

        // idempotent
        chat.mark_all_as_read();
        assert_eq!(chat.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_mark_before_replies_settle() {
        let chat = fast_service();
        let pending: Vec<_> = (0..3).map(|_| chat.send_message("rápido")).collect();
        chat.mark_all_as_read();
        for handle in pending {
            handle.wait().await;
        }

        assert_eq!(chat.messages().len(), 6);
        chat.mark_all_as_read();
        assert_eq!(chat.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_abort_cancels_pending_reply() {
        let store = storage::shared(SlotStore::in_memory().unwrap());
        let chat = ChatService::new(store, Responder::new("Cazé tv", 500, 600));

        let pending = chat.send_message("Oi");
        pending.abort();
        pending.wait().await;

        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_log_restored_on_reopen() {
        let store = storage::shared(SlotStore::in_memory().unwrap());
        let chat = ChatService::new(store.clone(), Responder::new("Cazé tv", 1, 5));
        chat.send_message("Oi").wait().await;
        let before = chat.messages();

        let reopened = ChatService::new(store, Responder::new("Cazé tv", 1, 5));
        assert_eq!(reopened.messages(), before);
        assert_eq!(reopened.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_pending_replies_do_not_survive_restart() {
        let store = storage::shared(SlotStore::in_memory().unwrap());
        let chat = ChatService::new(store.clone(), Responder::new("Cazé tv", 500, 600));
        let pending = chat.send_message("Oi");
        pending.abort();
        pending.wait().await;

        // only the persisted outbound half comes back
        let reopened = ChatService::new(store, Responder::new("Cazé tv", 1, 5));
        assert_eq!(reopened.messages().len(), 1);
    }
}
