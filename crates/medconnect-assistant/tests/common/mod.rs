#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use medconnect_assistant::status::{RequestState, StatusTracker};
use medconnect_copilot::{BoxFuture, CopilotBackend, CopilotError};
use medconnect_core::models::analysis::{AnalyzeRequest, AnalyzeResponse};
use medconnect_core::models::chat::{CopilotChatReply, CopilotChatRequest};
use medconnect_core::models::evidence::{Paper, PublicationYear, SearchRequest, SearchResponse};
use medconnect_core::models::form::{FormField, FormSnapshot};

/// In-memory copilot that records every request it receives.
#[derive(Default)]
pub struct FakeBackend {
    pub search_requests: Mutex<Vec<SearchRequest>>,
    pub analyze_requests: Mutex<Vec<AnalyzeRequest>>,
    pub chat_requests: Mutex<Vec<CopilotChatRequest>>,
    pub search_response: Mutex<SearchResponse>,
    pub analyze_response: Mutex<AnalyzeResponse>,
    pub chat_reply: Mutex<CopilotChatReply>,
    pub fail: Mutex<bool>,
    /// When set, calls wait for a notification before answering.
    pub gate: Mutex<Option<Arc<Notify>>>,
    /// Status observed while a call was in flight.
    pub status_probe: Mutex<Option<StatusTracker>>,
    pub observed_states: Mutex<Vec<RequestState>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_papers(count: usize) -> Arc<Self> {
        let backend = Self::default();
        *backend.search_response.lock().unwrap() = SearchResponse {
            success: true,
            evidence: (1..=count).map(paper).collect(),
            error: None,
        };
        Arc::new(backend)
    }

    pub fn network_calls(&self) -> usize {
        self.search_requests.lock().unwrap().len()
            + self.analyze_requests.lock().unwrap().len()
            + self.chat_requests.lock().unwrap().len()
    }

    async fn before_reply(&self) -> Result<(), CopilotError> {
        if let Some(status) = self.status_probe.lock().unwrap().as_ref() {
            self.observed_states
                .lock()
                .unwrap()
                .push(status.current().state);
        }
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.fail.lock().unwrap() {
            return Err(CopilotError::Status {
                status: 503,
                body: "servicio no disponible".to_string(),
            });
        }
        Ok(())
    }
}

impl CopilotBackend for FakeBackend {
    fn search_evidence(
        &self,
        request: SearchRequest,
    ) -> BoxFuture<'_, Result<SearchResponse, CopilotError>> {
        Box::pin(async move {
            self.search_requests.lock().unwrap().push(request);
            self.before_reply().await?;
            Ok(self.search_response.lock().unwrap().clone())
        })
    }

    fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> BoxFuture<'_, Result<AnalyzeResponse, CopilotError>> {
        Box::pin(async move {
            self.analyze_requests.lock().unwrap().push(request);
            self.before_reply().await?;
            Ok(self.analyze_response.lock().unwrap().clone())
        })
    }

    fn chat(
        &self,
        request: CopilotChatRequest,
    ) -> BoxFuture<'_, Result<CopilotChatReply, CopilotError>> {
        Box::pin(async move {
            self.chat_requests.lock().unwrap().push(request);
            self.before_reply().await?;
            Ok(self.chat_reply.lock().unwrap().clone())
        })
    }
}

pub fn paper(n: usize) -> Paper {
    Paper {
        title: format!("Paper {n}"),
        authors: vec!["Pérez J".to_string(), "Soto M".to_string()],
        journal: "Revista de Kinesiología".to_string(),
        year: Some(PublicationYear::Number(2020 + n as i64)),
        abstract_text: "Estudio controlado sobre el manejo conservador.".to_string(),
        relevance_score: 0.9,
        ..Paper::default()
    }
}

pub fn full_form() -> FormSnapshot {
    FormSnapshot::from_fields([
        (FormField::ConsultationReason, "dolor de hombro derecho"),
        (FormField::CareType, "kinesiologia"),
        (FormField::PatientAge, "47"),
    ])
}
