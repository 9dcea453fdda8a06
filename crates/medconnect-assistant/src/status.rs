//! AI status indicator (the dot and label next to the chat).

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

/// Lifecycle of a single copilot request.
///
/// `Idle → Processing → (Succeeded | Failed) → Idle`. There is no
/// cancellation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    Processing,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn label(self) -> &'static str {
        match self {
            RequestState::Idle => "Asistente listo",
            RequestState::Processing => "Procesando...",
            RequestState::Succeeded => "Análisis completado",
            RequestState::Failed => "Error en el análisis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiStatus {
    pub state: RequestState,
    pub text: String,
}

impl From<RequestState> for AiStatus {
    fn from(state: RequestState) -> Self {
        Self {
            state,
            text: state.label().to_string(),
        }
    }
}

/// Publishes the current [`AiStatus`] to any number of watchers.
#[derive(Clone)]
pub struct StatusTracker {
    tx: watch::Sender<AiStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(RequestState::Idle.into()),
        }
    }

    pub fn set(&self, state: RequestState) {
        debug!(state = ?state, "ai status");
        self.tx.send_replace(state.into());
    }

    pub fn current(&self) -> AiStatus {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AiStatus> {
        self.tx.subscribe()
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
