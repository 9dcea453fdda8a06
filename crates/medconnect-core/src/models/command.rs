use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::analysis::{AnalyzeResponse, ClinicalAnalysis, NlpAnalysis};
use super::evidence::{Paper, SearchResponse};

/// A classified user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Command {
    /// Look up scientific evidence on `topic`.
    Search { topic: String },
    Analyze,
    Recommend,
    Evaluate,
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Search { .. } => "search",
            Command::Analyze => "analyze",
            Command::Recommend => "recommend",
            Command::Evaluate => "evaluate",
            Command::Help => "help",
        }
    }

    /// Whether the command calls the backend and therefore needs form context.
    pub fn needs_context(&self) -> bool {
        !matches!(self, Command::Help)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalised outcome of one copilot call, consumed once by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommandResult {
    pub success: bool,
    pub evidence: Vec<Paper>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_analysis: Option<ClinicalAnalysis>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nlp_analysis: Option<NlpAnalysis>,
    #[serde(default)]
    pub patient_education: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    /// Nothing renderable came back.
    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
            && self.clinical_analysis.is_none()
            && self.recommendations.is_empty()
            && self.nlp_analysis.is_none()
            && self.patient_education.is_empty()
    }
}

impl From<SearchResponse> for CommandResult {
    fn from(response: SearchResponse) -> Self {
        Self {
            success: response.success,
            evidence: response.evidence,
            error: response.error,
            ..Self::default()
        }
    }
}

impl From<AnalyzeResponse> for CommandResult {
    fn from(response: AnalyzeResponse) -> Self {
        // Top-level recommendations win; the analysis block may carry its own.
        let recommendations = response
            .recommendations
            .as_ref()
            .map(|r| r.items())
            .filter(|items| !items.is_empty())
            .or_else(|| {
                response
                    .clinical_analysis
                    .as_ref()
                    .and_then(|a| a.recommendations.as_ref())
                    .map(|r| r.items())
            })
            .unwrap_or_default();

        Self {
            success: response.success,
            evidence: response.evidence.unwrap_or_default(),
            clinical_analysis: response.clinical_analysis,
            recommendations,
            nlp_analysis: response.nlp_analysis,
            patient_education: response
                .patient_education
                .map(|p| p.items())
                .unwrap_or_default(),
            error: response.error,
        }
    }
}
