//! reqwest-backed copilot client.
//!
//! All endpoints are JSON over POST relative to a single base URL (the
//! dashboard origin). Failures are never retried here: a failed call is
//! reported once and the caller decides what to show.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use url::Url;

use medconnect_core::endpoints;
use medconnect_core::models::analysis::{AnalyzeRequest, AnalyzeResponse};
use medconnect_core::models::chat::{CopilotChatReply, CopilotChatRequest};
use medconnect_core::models::evidence::{SearchRequest, SearchResponse};

use crate::backend::{BoxFuture, CopilotBackend};
use crate::error::CopilotError;

/// Copilot backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCopilot {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCopilot {
    /// Build a client for `base_url`.
    ///
    /// A trailing slash is added when missing so endpoint paths are joined
    /// under the base path instead of replacing its last segment.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, CopilotError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CopilotError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        info!(url = %url, "calling copilot endpoint");

        let response = self.client.post(url.clone()).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "copilot endpoint returned an error status");
            return Err(CopilotError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            CopilotError::ResponseParse(format!(
                "{e}. Response: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })
    }
}

impl CopilotBackend for HttpCopilot {
    fn search_evidence(
        &self,
        request: SearchRequest,
    ) -> BoxFuture<'_, Result<SearchResponse, CopilotError>> {
        Box::pin(async move {
            let response: SearchResponse =
                self.post_json(endpoints::SEARCH_ENHANCED, &request).await?;
            info!(
                topic = %request.motivo_consulta,
                count = response.evidence.len(),
                "evidence search complete"
            );
            Ok(response)
        })
    }

    fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> BoxFuture<'_, Result<AnalyzeResponse, CopilotError>> {
        Box::pin(async move {
            let response: AnalyzeResponse =
                self.post_json(endpoints::ANALYZE_ENHANCED, &request).await?;
            info!(
                success = response.success,
                has_analysis = response.clinical_analysis.is_some(),
                "clinical analysis complete"
            );
            Ok(response)
        })
    }

    fn chat(
        &self,
        request: CopilotChatRequest,
    ) -> BoxFuture<'_, Result<CopilotChatReply, CopilotError>> {
        Box::pin(async move { self.post_json(endpoints::CHAT, &request).await })
    }
}
