use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// Role tag of a transcript message. Drives styling in the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChatRole {
    User,
    System,
    Info,
    Warning,
    Error,
    Success,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::System => "system",
            ChatRole::Info => "info",
            ChatRole::Warning => "warning",
            ChatRole::Error => "error",
            ChatRole::Success => "success",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ChatRole::User),
            "system" => Ok(ChatRole::System),
            "info" => Ok(ChatRole::Info),
            "warning" => Ok(ChatRole::Warning),
            "error" => Ok(ChatRole::Error),
            "success" => Ok(ChatRole::Success),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// Which part of the assistant produced a message.
///
/// Cleanup of stale or duplicate messages queries this tag instead of
/// matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MessageSource {
    /// Typed by the user.
    User,
    /// Response to an explicit chat command.
    Command,
    /// Response triggered by auto mode on a form change.
    AutoAnalysis,
    /// Free-form copilot conversation.
    Chat,
    /// Static help text.
    Help,
    /// Anything else the dashboard posts (greetings, notices).
    System,
}

/// A single immutable entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub role: ChatRole,
    pub source: MessageSource,
    /// The dispatch that produced this message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub timestamp: jiff::Timestamp,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, role: ChatRole, source: MessageSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            role,
            source,
            request_id: None,
            timestamp: jiff::Timestamp::now(),
        }
    }

    pub fn with_request(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

/// Body of `POST /api/copilot/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CopilotChatRequest {
    pub message: String,
    pub context: super::form::FormSnapshot,
}

/// Response of `POST /api/copilot/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CopilotChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
