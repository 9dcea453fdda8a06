use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopilotError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
