//! Inbound message queue.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bridge_core::Message;
use tokio::sync::Notify;

/// Unbounded FIFO between producers (the driver, the cycle itself) and
/// the single consuming application.
///
/// `push` never blocks or fails. `receive` waits until a message is
/// available.
#[derive(Debug, Default)]
pub struct AppQueue {
    messages: Mutex<VecDeque<Message>>,
    ready: Notify,
}

impl AppQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and wake the consumer.
    pub fn push(&self, message: Message) {
        self.lock().push_back(message);
        // Stores a permit if nobody is waiting yet, so a consumer that
        // checked the queue just before this push still wakes up.
        self.ready.notify_one();
    }

    /// Wait for the next message.
    pub async fn receive(&self) -> Message {
        loop {
            if let Some(message) = self.try_receive() {
                return message;
            }
            self.ready.notified().await;
        }
    }

    /// Take the next message if one is queued.
    pub fn try_receive(&self) -> Option<Message> {
        self.lock().pop_front()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_receive_in_insertion_order() {
        let queue = AppQueue::new();
        for i in 0..5 {
            queue.push(Message::other(format!("m{}", i)));
        }
        for i in 0..5 {
            let message = queue.receive().await;
            assert_eq!(message.message_type(), format!("m{}", i));
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_interleaved_pushes_keep_order() {
        let queue = AppQueue::new();
        queue.push(Message::other("a"));
        queue.push(Message::other("b"));
        assert_eq!(queue.try_receive().map(|m| m.message_type().to_string()), Some("a".into()));
        queue.push(Message::other("c"));
        assert_eq!(queue.receive().await.message_type(), "b");
        assert_eq!(queue.receive().await.message_type(), "c");
    }

    #[tokio::test]
    async fn test_receive_waits_for_push() {
        let queue = Arc::new(AppQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.receive().await })
        };

        tokio::task::yield_now().await;
        queue.push(Message::HttpDisconnect);

        let message = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("receive should wake")
            .unwrap();
        assert_eq!(message, Message::HttpDisconnect);
    }

    #[tokio::test]
    async fn test_receive_blocks_when_empty() {
        let queue = AppQueue::new();
        let result = tokio::time::timeout(Duration::from_millis(20), queue.receive()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_len_tracks_pushes() {
        let queue = AppQueue::new();
        assert_eq!(queue.len(), 0);
        queue.push(Message::HttpDisconnect);
        queue.push(Message::HttpDisconnect);
        assert_eq!(queue.len(), 2);
        queue.try_receive();
        assert_eq!(queue.len(), 1);
    }
}
