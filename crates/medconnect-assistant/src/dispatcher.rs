//! Command dispatch to the copilot backend.
//!
//! Every dispatch posts exactly one response message to the transcript:
//! the rendered result, a "no results" notice, a warning, or an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};
use uuid::Uuid;

use medconnect_copilot::CopilotBackend;
use medconnect_core::models::analysis::AnalyzeRequest;
use medconnect_core::models::chat::{ChatMessage, ChatRole, CopilotChatRequest, MessageSource};
use medconnect_core::models::command::{Command, CommandResult};
use medconnect_core::models::evidence::SearchRequest;
use medconnect_core::models::form::FormSnapshot;

use crate::error::AssistantError;
use crate::observer::FormObserver;
use crate::render;
use crate::status::{RequestState, StatusTracker};
use crate::transcript::Transcript;

/// What a dispatch ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A rendered result (or help text) was posted.
    Rendered,
    /// The backend answered but had nothing to show.
    NoResults,
    /// The form lacks a consultation reason or care type; nothing was sent.
    InsufficientContext,
    /// Another request was still processing; this one was dropped.
    Busy,
    /// The call failed and an error message was posted.
    Failed,
}

pub struct Dispatcher {
    backend: Arc<dyn CopilotBackend>,
    observer: Arc<FormObserver>,
    transcript: Transcript,
    status: StatusTracker,
    processing: AtomicBool,
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn CopilotBackend>,
        observer: Arc<FormObserver>,
        transcript: Transcript,
        status: StatusTracker,
    ) -> Self {
        Self {
            backend,
            observer,
            transcript,
            status,
            processing: AtomicBool::new(false),
        }
    }

    pub fn observer(&self) -> &Arc<FormObserver> {
        &self.observer
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Run `command` against the current form context.
    ///
    /// `user_text` is the message that produced the command; it stands in
    /// for the consultation text if the form has none.
    pub async fn dispatch(
        &self,
        command: &Command,
        user_text: &str,
        source: MessageSource,
    ) -> DispatchOutcome {
        if !command.needs_context() {
            self.post(render::HELP_TEXT, ChatRole::Info, MessageSource::Help, None)
                .await;
            return DispatchOutcome::Rendered;
        }

        let snapshot = self.observer.snapshot();
        if !snapshot.is_sufficient() {
            warn!(command = %command, "insufficient form context, skipping dispatch");
            self.post(
                render::INSUFFICIENT_CONTEXT_TEXT,
                ChatRole::Warning,
                source,
                None,
            )
            .await;
            return DispatchOutcome::InsufficientContext;
        }

        let Some(_guard) = self.begin() else {
            warn!(command = %command, "request already in flight, dropping");
            self.post(render::BUSY_TEXT, ChatRole::Warning, source, None)
                .await;
            return DispatchOutcome::Busy;
        };

        let request_id = Uuid::new_v4();
        info!(request_id = %request_id, command = %command, "dispatching command");

        match self.execute(command, user_text, snapshot).await {
            Ok(result) if result.is_empty() => {
                self.status.set(RequestState::Succeeded);
                info!(request_id = %request_id, "command returned no results");
                self.post(
                    &render::render_no_results(command),
                    ChatRole::Info,
                    source,
                    Some(request_id),
                )
                .await;
                DispatchOutcome::NoResults
            }
            Ok(result) => {
                self.status.set(RequestState::Succeeded);
                info!(
                    request_id = %request_id,
                    evidence = result.evidence.len(),
                    recommendations = result.recommendations.len(),
                    "command complete"
                );
                self.post(
                    &render::render_result(command, &result),
                    ChatRole::Success,
                    source,
                    Some(request_id),
                )
                .await;
                DispatchOutcome::Rendered
            }
            Err(e) => {
                self.status.set(RequestState::Failed);
                error!(request_id = %request_id, command = %command, error = %e, "command failed");
                self.post(
                    &render::render_error(&e.to_string()),
                    ChatRole::Error,
                    source,
                    Some(request_id),
                )
                .await;
                DispatchOutcome::Failed
            }
        }
    }

    /// Send free text to the copilot chat endpoint.
    pub async fn converse(&self, message: &str) -> DispatchOutcome {
        let snapshot = self.observer.snapshot();
        if !snapshot.is_sufficient() {
            self.post(
                render::INSUFFICIENT_CONTEXT_TEXT,
                ChatRole::Warning,
                MessageSource::Chat,
                None,
            )
            .await;
            return DispatchOutcome::InsufficientContext;
        }

        let Some(_guard) = self.begin() else {
            self.post(render::BUSY_TEXT, ChatRole::Warning, MessageSource::Chat, None)
                .await;
            return DispatchOutcome::Busy;
        };

        let request_id = Uuid::new_v4();
        let request = CopilotChatRequest {
            message: message.to_string(),
            context: snapshot,
        };

        let reply = match self.backend.chat(request).await {
            Ok(reply) if reply.success => Ok(reply.reply),
            Ok(reply) => Err(AssistantError::Backend(
                reply.error.unwrap_or_else(|| "respuesta sin éxito".to_string()),
            )),
            Err(e) => Err(e.into()),
        };

        match reply {
            Ok(text) if text.trim().is_empty() => {
                self.status.set(RequestState::Succeeded);
                self.post(
                    "ℹ️ El asistente no devolvió respuesta.",
                    ChatRole::Info,
                    MessageSource::Chat,
                    Some(request_id),
                )
                .await;
                DispatchOutcome::NoResults
            }
            Ok(text) => {
                self.status.set(RequestState::Succeeded);
                self.post(
                    &render::render_chat_reply(&text),
                    ChatRole::System,
                    MessageSource::Chat,
                    Some(request_id),
                )
                .await;
                DispatchOutcome::Rendered
            }
            Err(e) => {
                self.status.set(RequestState::Failed);
                error!(request_id = %request_id, error = %e, "chat failed");
                self.post(
                    &render::render_error(&e.to_string()),
                    ChatRole::Error,
                    MessageSource::Chat,
                    Some(request_id),
                )
                .await;
                DispatchOutcome::Failed
            }
        }
    }

    async fn execute(
        &self,
        command: &Command,
        user_text: &str,
        snapshot: FormSnapshot,
    ) -> Result<CommandResult, AssistantError> {
        let result: CommandResult = match command {
            Command::Search { topic } => self
                .backend
                .search_evidence(SearchRequest {
                    motivo_consulta: topic.clone(),
                    contexto_clinico: snapshot,
                })
                .await?
                .into(),
            // Recommend and evaluate share the analysis endpoint; they only
            // differ in how the result is rendered.
            Command::Analyze | Command::Recommend | Command::Evaluate => {
                let consulta = match snapshot.consultation_reason() {
                    "" => user_text.trim().to_string(),
                    reason => reason.to_string(),
                };
                self.backend
                    .analyze(AnalyzeRequest {
                        consulta,
                        contexto_clinico: snapshot,
                    })
                    .await?
                    .into()
            }
            Command::Help => CommandResult::default(),
        };

        if !result.success {
            return Err(AssistantError::Backend(
                result
                    .error
                    .unwrap_or_else(|| "respuesta sin éxito".to_string()),
            ));
        }
        Ok(result)
    }

    /// Claim the processing flag, or `None` if a request is in flight.
    fn begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.status.set(RequestState::Processing);
        Some(ProcessingGuard { dispatcher: self })
    }

    async fn post(
        &self,
        text: &str,
        role: ChatRole,
        source: MessageSource,
        request_id: Option<Uuid>,
    ) {
        let mut message = ChatMessage::new(text, role, source);
        if let Some(id) = request_id {
            message = message.with_request(id);
        }
        self.transcript.append(message).await;
    }
}

/// Returns the dispatcher to idle however the request ended.
struct ProcessingGuard<'a> {
    dispatcher: &'a Dispatcher,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.status.set(RequestState::Idle);
        self.dispatcher.processing.store(false, Ordering::Release);
    }
}
