use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("copilot error: {0}")]
    Copilot(#[from] medconnect_copilot::CopilotError),

    #[error("copilot reported failure: {0}")]
    Backend(String),
}
