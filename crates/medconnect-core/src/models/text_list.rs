use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A backend field that may arrive either as an array of strings or as a
/// single (possibly multi-line) string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum TextList {
    Many(Vec<String>),
    One(String),
}

impl TextList {
    /// Normalise to trimmed, non-empty items.
    ///
    /// A single string is split on line breaks and leading bullet markers
    /// (`-`, `*`, `•`) are dropped, so both shapes render the same way.
    pub fn items(&self) -> Vec<String> {
        match self {
            TextList::Many(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            TextList::One(text) => text
                .lines()
                .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl Default for TextList {
    fn default() -> Self {
        TextList::Many(Vec::new())
    }
}

impl From<Vec<String>> for TextList {
    fn from(items: Vec<String>) -> Self {
        TextList::Many(items)
    }
}
