use std::future::Future;
use std::pin::Pin;

use medconnect_core::models::analysis::{AnalyzeRequest, AnalyzeResponse};
use medconnect_core::models::chat::{CopilotChatReply, CopilotChatRequest};
use medconnect_core::models::evidence::{SearchRequest, SearchResponse};

use crate::error::CopilotError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The copilot operations the assistant can dispatch to.
///
/// One method per endpoint. `HttpCopilot` is the production implementation;
/// tests substitute in-memory fakes.
///
/// Methods return boxed futures for dyn compatibility.
pub trait CopilotBackend: Send + Sync {
    /// `POST /api/copilot/search-enhanced`
    fn search_evidence(
        &self,
        request: SearchRequest,
    ) -> BoxFuture<'_, Result<SearchResponse, CopilotError>>;

    /// `POST /api/copilot/analyze-enhanced`
    fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> BoxFuture<'_, Result<AnalyzeResponse, CopilotError>>;

    /// `POST /api/copilot/chat`
    fn chat(
        &self,
        request: CopilotChatRequest,
    ) -> BoxFuture<'_, Result<CopilotChatReply, CopilotError>>;
}
