use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::form::FormSnapshot;
use super::lenient::null_as_default;

/// DOI placeholder the search backend uses for papers without one.
pub const NO_DOI_SENTINEL: &str = "Sin DOI";

/// A scientific paper returned by the evidence search.
///
/// Sourced entirely from the backend and never modified client-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Paper {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub journal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<PublicationYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, rename = "abstract", deserialize_with = "null_as_default")]
    pub abstract_text: String,
    /// Backend relevance in `[0, 1]`.
    #[serde(default, alias = "relevanceScore", deserialize_with = "null_as_default")]
    pub relevance_score: f64,
}

impl Paper {
    /// The DOI, unless it is missing, blank or the "Sin DOI" placeholder.
    pub fn resolvable_doi(&self) -> Option<&str> {
        self.doi
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != NO_DOI_SENTINEL)
    }
}

/// Publication year as sent by the backend: some sources give a number,
/// others a free-text string such as `"2021 Mar"`. Whole-valued floats
/// (`2021.0`) print as plain years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum PublicationYear {
    Number(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PublicationYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicationYear::Number(n) => write!(f, "{n}"),
            PublicationYear::Float(y) if y.fract() == 0.0 => write!(f, "{}", *y as i64),
            PublicationYear::Float(y) => write!(f, "{y}"),
            PublicationYear::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Body of `POST /api/copilot/search-enhanced`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchRequest {
    pub motivo_consulta: String,
    pub contexto_clinico: FormSnapshot,
}

/// Response of `POST /api/copilot/search-enhanced`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: Vec<Paper>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
