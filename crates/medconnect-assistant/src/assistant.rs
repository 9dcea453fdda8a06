use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use medconnect_copilot::CopilotBackend;
use medconnect_core::models::chat::ChatRole;
use medconnect_core::models::form::FormSnapshot;

use crate::auto;
use crate::bus::{ChatFallbackInterceptor, CommandInterceptor, MessageBus, PostOutcome};
use crate::dispatcher::Dispatcher;
use crate::observer::FormObserver;
use crate::source::FormSource;
use crate::status::StatusTracker;
use crate::transcript::Transcript;

/// Behaviour switches for a single [`Assistant`].
#[derive(Debug, Clone)]
pub struct AssistantOptions {
    /// Analyse automatically after the form settles.
    pub auto_mode: bool,
    pub auto_debounce: Duration,
    /// Send non-command messages to the copilot chat instead of answering
    /// with the help text.
    pub chat_fallback: bool,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            auto_mode: false,
            auto_debounce: auto::DEFAULT_DEBOUNCE,
            chat_fallback: false,
        }
    }
}

/// One observer, one dispatcher and one bus, wired together.
///
/// Creating an assistant with `auto_mode` on spawns a task and therefore
/// needs a running tokio runtime.
pub struct Assistant {
    bus: MessageBus,
    dispatcher: Arc<Dispatcher>,
    observer: Arc<FormObserver>,
    status: StatusTracker,
    auto_task: Option<JoinHandle<()>>,
}

impl Assistant {
    pub fn new(
        backend: Arc<dyn CopilotBackend>,
        form: Arc<dyn FormSource>,
        options: AssistantOptions,
    ) -> Self {
        let transcript = Transcript::new();
        let status = StatusTracker::new();
        let observer = Arc::new(FormObserver::new(form));
        let dispatcher = Arc::new(Dispatcher::new(
            backend,
            observer.clone(),
            transcript.clone(),
            status.clone(),
        ));

        let mut bus = MessageBus::new(transcript);
        bus.register(Box::new(CommandInterceptor::new(
            dispatcher.clone(),
            !options.chat_fallback,
        )));
        if options.chat_fallback {
            bus.register(Box::new(ChatFallbackInterceptor::new(dispatcher.clone())));
        }

        let auto_task = options.auto_mode.then(|| {
            auto::spawn(
                dispatcher.clone(),
                observer.subscribe(),
                options.auto_debounce,
            )
        });

        info!(
            auto_mode = options.auto_mode,
            chat_fallback = options.chat_fallback,
            interceptors = ?bus.interceptor_names(),
            "assistant ready"
        );

        Self {
            bus,
            dispatcher,
            observer,
            status,
            auto_task,
        }
    }

    /// Submit a chat message.
    pub async fn post(&self, text: &str, role: ChatRole) -> PostOutcome {
        self.bus.post(text, role).await
    }

    /// Signal that the form changed. Returns `true` if the snapshot differs.
    pub fn form_changed(&self) -> bool {
        self.observer.refresh()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.observer.snapshot()
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn observer(&self) -> &Arc<FormObserver> {
        &self.observer
    }

    pub fn transcript(&self) -> &Transcript {
        self.bus.transcript()
    }

    pub fn status(&self) -> &StatusTracker {
        &self.status
    }
}

impl Drop for Assistant {
    fn drop(&mut self) {
        if let Some(task) = self.auto_task.take() {
            task.abort();
        }
    }
}
