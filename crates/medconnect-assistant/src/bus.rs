//! The chat message bus.
//!
//! Every message bound for the transcript goes through [`MessageBus::post`].
//! Interceptors get the first look in ascending priority order; the first
//! one whose predicate matches takes the message over. Messages nobody
//! claims are appended to the transcript as-is.

use std::sync::Arc;

use tracing::debug;

use medconnect_copilot::BoxFuture;
use medconnect_core::models::chat::{ChatMessage, ChatRole, MessageSource};

use crate::classifier;
use crate::dispatcher::Dispatcher;
use crate::transcript::Transcript;

/// A message handler with a predicate and a fixed priority.
///
/// Lower priorities run first. Interceptors with equal priority run in
/// registration order.
pub trait Interceptor: Send + Sync {
    /// Short identifier, used in logs and [`PostOutcome::Intercepted`].
    fn name(&self) -> &str;

    fn priority(&self) -> i32;

    fn matches(&self, message: &ChatMessage) -> bool;

    /// Take over `message`. The interceptor decides whether the message
    /// itself reaches the transcript.
    fn handle(&self, message: ChatMessage) -> BoxFuture<'_, ()>;
}

/// Where a posted message ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Appended,
    Intercepted(String),
}

pub struct MessageBus {
    transcript: Transcript,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl MessageBus {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            interceptors: Vec::new(),
        }
    }

    pub fn register(&mut self, interceptor: Box<dyn Interceptor>) {
        let position = self
            .interceptors
            .iter()
            .position(|i| i.priority() > interceptor.priority())
            .unwrap_or(self.interceptors.len());
        debug!(
            name = interceptor.name(),
            priority = interceptor.priority(),
            "registering interceptor"
        );
        self.interceptors.insert(position, interceptor);
    }

    /// Interceptor names in evaluation order.
    pub fn interceptor_names(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Post `text` with `role`. User messages are tagged as user input,
    /// everything else as a system notice.
    pub async fn post(&self, text: &str, role: ChatRole) -> PostOutcome {
        let source = match role {
            ChatRole::User => MessageSource::User,
            _ => MessageSource::System,
        };
        self.post_message(ChatMessage::new(text, role, source)).await
    }

    pub async fn post_message(&self, message: ChatMessage) -> PostOutcome {
        if let Some(interceptor) = self.interceptors.iter().find(|i| i.matches(&message)) {
            debug!(interceptor = interceptor.name(), role = %message.role, "message intercepted");
            let name = interceptor.name().to_string();
            interceptor.handle(message).await;
            return PostOutcome::Intercepted(name);
        }

        self.transcript.append(message).await;
        PostOutcome::Appended
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

/// Reroutes user messages that name a command to the dispatcher.
///
/// With `catch_all` set, every non-empty user message is treated as a
/// command, so unrecognised text falls back to the help text.
pub struct CommandInterceptor {
    dispatcher: Arc<Dispatcher>,
    catch_all: bool,
}

impl CommandInterceptor {
    pub const PRIORITY: i32 = 10;

    pub fn new(dispatcher: Arc<Dispatcher>, catch_all: bool) -> Self {
        Self {
            dispatcher,
            catch_all,
        }
    }
}

impl Interceptor for CommandInterceptor {
    fn name(&self) -> &str {
        "command"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn matches(&self, message: &ChatMessage) -> bool {
        message.role == ChatRole::User
            && !message.text.trim().is_empty()
            && (self.catch_all || classifier::recognize(&message.text).is_some())
    }

    fn handle(&self, message: ChatMessage) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let command = classifier::classify(&message.text);
            let text = message.text.clone();
            self.dispatcher.transcript().append(message).await;
            self.dispatcher
                .dispatch(&command, &text, MessageSource::Command)
                .await;
        })
    }
}

/// Sends non-command user messages to the copilot chat endpoint.
pub struct ChatFallbackInterceptor {
    dispatcher: Arc<Dispatcher>,
}

impl ChatFallbackInterceptor {
    pub const PRIORITY: i32 = 100;

    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl Interceptor for ChatFallbackInterceptor {
    fn name(&self) -> &str {
        "chat_fallback"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn matches(&self, message: &ChatMessage) -> bool {
        message.role == ChatRole::User
            && !message.text.trim().is_empty()
            && classifier::recognize(&message.text).is_none()
    }

    fn handle(&self, message: ChatMessage) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let text = message.text.clone();
            self.dispatcher.transcript().append(message).await;
            self.dispatcher.converse(&text).await;
        })
    }
}
