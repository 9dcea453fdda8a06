//! medconnect-assistant
//!
//! Chat command routing for the dashboard copilot: form context
//! observation, command classification, dispatch to the copilot backend,
//! result rendering, and the message bus that ties them to the transcript.
//!
//! Public API:
//! - `Assistant::new()` : wire observer, dispatcher and bus around a backend
//! - `Assistant::post()` : submit a chat message through the bus
//! - `classifier::classify()` : text → `Command`
//! - `render::render_result()` : `CommandResult` → display text

pub mod assistant;
pub mod auto;
pub mod bus;
pub mod classifier;
pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod render;
pub mod source;
pub mod status;
pub mod transcript;

pub use crate::assistant::{Assistant, AssistantOptions};
pub use crate::bus::{Interceptor, MessageBus, PostOutcome};
pub use crate::dispatcher::{DispatchOutcome, Dispatcher};
pub use crate::error::AssistantError;
pub use crate::observer::FormObserver;
pub use crate::source::{FormSource, MemoryForm};
pub use crate::status::{AiStatus, RequestState, StatusTracker};
pub use crate::transcript::Transcript;
