//! medconnect-copilot
//!
//! HTTP access to the MedConnect copilot endpoints: evidence search,
//! clinical analysis and free-form chat.

pub mod backend;
pub mod client;
pub mod error;

pub use crate::backend::{BoxFuture, CopilotBackend};
pub use crate::client::HttpCopilot;
pub use crate::error::CopilotError;
