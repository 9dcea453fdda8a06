mod common;

use std::sync::{Arc, Mutex};

use medconnect_assistant::render::HELP_TEXT;
use medconnect_assistant::{Assistant, AssistantOptions, Interceptor, PostOutcome};
use medconnect_copilot::BoxFuture;
use medconnect_core::models::chat::{ChatMessage, ChatRole, CopilotChatReply, MessageSource};

use common::{FakeBackend, full_form};

/// Claims messages starting with a prefix and records them.
struct Prefixed {
    name: &'static str,
    priority: i32,
    prefix: &'static str,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Interceptor for Prefixed {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn matches(&self, message: &ChatMessage) -> bool {
        message.text.starts_with(self.prefix)
    }

    fn handle(&self, message: ChatMessage) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(message.text);
        })
    }
}

fn prefixed(name: &'static str, priority: i32, prefix: &'static str) -> (Box<Prefixed>, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let interceptor = Box::new(Prefixed {
        name,
        priority,
        prefix,
        seen: seen.clone(),
    });
    (interceptor, seen)
}

#[tokio::test]
async fn interceptors_run_in_priority_order() {
    let mut assistant = Assistant::new(
        FakeBackend::new(),
        Arc::new(full_form()),
        AssistantOptions::default(),
    );
    let (late, late_seen) = prefixed("late", 50, "/");
    let (early, early_seen) = prefixed("early", 5, "/busca");
    assistant.bus_mut().register(late);
    assistant.bus_mut().register(early);

    assert_eq!(
        assistant.bus().interceptor_names(),
        vec!["early", "command", "late"]
    );

    // The earliest matching interceptor wins, even over the command router.
    let outcome = assistant.post("/busca papers de hombro", ChatRole::User).await;
    assert_eq!(outcome, PostOutcome::Intercepted("early".to_string()));
    assert_eq!(*early_seen.lock().unwrap(), vec!["/busca papers de hombro"]);

    // System notices skip the command router and reach the later one.
    let outcome = assistant.post("/reinicio", ChatRole::System).await;
    assert_eq!(outcome, PostOutcome::Intercepted("late".to_string()));
    assert_eq!(*late_seen.lock().unwrap(), vec!["/reinicio"]);

    // Interceptors decide about the transcript themselves.
    assert!(assistant.transcript().is_empty().await);
}

#[tokio::test]
async fn equal_priorities_keep_registration_order() {
    let mut assistant = Assistant::new(
        FakeBackend::new(),
        Arc::new(full_form()),
        AssistantOptions::default(),
    );
    let (first, _) = prefixed("first", 20, "/");
    let (second, _) = prefixed("second", 20, "/");
    assistant.bus_mut().register(first);
    assistant.bus_mut().register(second);

    assert_eq!(
        assistant.bus().interceptor_names(),
        vec!["command", "first", "second"]
    );
    assert_eq!(
        assistant.post("/x", ChatRole::Info).await,
        PostOutcome::Intercepted("first".to_string())
    );
}

#[tokio::test]
async fn unclaimed_messages_are_appended() {
    let assistant = Assistant::new(
        FakeBackend::new(),
        Arc::new(full_form()),
        AssistantOptions::default(),
    );

    assert_eq!(
        assistant.post("Sesión iniciada", ChatRole::Info).await,
        PostOutcome::Appended
    );
    assert_eq!(assistant.post("   ", ChatRole::User).await, PostOutcome::Appended);

    let messages = assistant.transcript().messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].source, MessageSource::System);
    assert_eq!(messages[1].source, MessageSource::User);
}

#[tokio::test]
async fn chat_fallback_answers_free_text() {
    let backend = FakeBackend::new();
    *backend.chat_reply.lock().unwrap() = CopilotChatReply {
        success: true,
        reply: "Conviene descartar compromiso del manguito rotador.".to_string(),
        error: None,
    };
    let assistant = Assistant::new(
        backend.clone(),
        Arc::new(full_form()),
        AssistantOptions {
            chat_fallback: true,
            ..AssistantOptions::default()
        },
    );
    assert_eq!(
        assistant.bus().interceptor_names(),
        vec!["command", "chat_fallback"]
    );

    let outcome = assistant
        .post("¿Qué opinas del dolor nocturno?", ChatRole::User)
        .await;
    assert_eq!(outcome, PostOutcome::Intercepted("chat_fallback".to_string()));

    let requests = backend.chat_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "¿Qué opinas del dolor nocturno?");
    assert_eq!(requests[0].context.consultation_reason(), "dolor de hombro derecho");

    let messages = assistant.transcript().messages().await;
    let reply = messages.last().unwrap();
    assert_eq!(reply.source, MessageSource::Chat);
    assert_eq!(
        reply.text,
        "🤖 Conviene descartar compromiso del manguito rotador."
    );

    // Commands still go to the dispatcher.
    let outcome = assistant.post("ayuda", ChatRole::User).await;
    assert_eq!(outcome, PostOutcome::Intercepted("command".to_string()));
    let messages = assistant.transcript().messages().await;
    assert_eq!(messages.last().unwrap().text, HELP_TEXT);
}
