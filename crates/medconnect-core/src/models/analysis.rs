use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::evidence::Paper;
use super::form::FormSnapshot;
use super::lenient::null_as_default;
use super::text_list::TextList;

/// Body of `POST /api/copilot/analyze-enhanced`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyzeRequest {
    pub consulta: String,
    pub contexto_clinico: FormSnapshot,
}

/// Response of `POST /api/copilot/analyze-enhanced`.
///
/// Every section is optional; the backend omits what it could not produce.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyzeResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nlp_analysis: Option<NlpAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_analysis: Option<ClinicalAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<Paper>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_education: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Language-level findings extracted from the consultation text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NlpAnalysis {
    #[serde(default, alias = "palabras_clave", deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,
    #[serde(default, alias = "sintomas", deserialize_with = "null_as_default")]
    pub symptoms: Vec<String>,
    #[serde(default, alias = "entidades", deserialize_with = "null_as_default")]
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Keyword {
    #[serde(default, alias = "keyword", alias = "text", deserialize_with = "null_as_default")]
    pub term: String,
    /// Model confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

/// Clinical reasoning returned by the copilot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Markdown report with `## Introducción`, `## Evaluación`, ... headings.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "analysis")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<TextList>,
}
