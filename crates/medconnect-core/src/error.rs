use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("unknown message role: {0}")]
    UnknownRole(String),
}
