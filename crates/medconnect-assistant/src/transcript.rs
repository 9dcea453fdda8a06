//! The visible chat transcript.
//!
//! Append-only from the assistant's point of view. Removal happens only in
//! bulk, by provenance: either every message from one source or every
//! message produced by one request.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use medconnect_core::models::chat::{ChatMessage, MessageSource};

const EVENT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct Transcript {
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    events: broadcast::Sender<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    /// Append a message and notify subscribers (auto-scroll, printers).
    pub async fn append(&self, message: ChatMessage) {
        self.messages.lock().await.push(message.clone());
        // No subscribers is fine.
        let _ = self.events.send(message);
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    /// Drop every message tagged with `source`. Returns how many were removed.
    pub async fn remove_by_source(&self, source: MessageSource) -> usize {
        self.retain(|m| m.source != source).await
    }

    /// Drop every message produced by the request `request_id`.
    pub async fn remove_request(&self, request_id: Uuid) -> usize {
        self.retain(|m| m.request_id != Some(request_id)).await
    }

    pub async fn clear(&self) -> usize {
        self.retain(|_| false).await
    }

    async fn retain(&self, keep: impl Fn(&ChatMessage) -> bool) -> usize {
        let mut messages = self.messages.lock().await;
        let before = messages.len();
        messages.retain(|m| keep(m));
        before - messages.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.events.subscribe()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
