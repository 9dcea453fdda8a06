//! Free-text command classification.
//!
//! Trigger phrases are matched against the lower-cased message, one command
//! at a time in a fixed order; the first command with a matching phrase
//! wins. Search is checked first because its phrases are the most specific
//! ("busca papers sobre el análisis de ..." is a search, not an analysis).

use std::sync::LazyLock;

use regex::Regex;

use medconnect_core::models::command::Command;

const SEARCH_TRIGGERS: &[&str] = &[
    "buscar papers",
    "busca papers",
    "buscar artículos",
    "busca artículos",
    "buscar articulos",
    "busca articulos",
    "buscar estudios",
    "busca estudios",
    "buscar evidencia",
    "busca evidencia",
    "papers sobre",
    "papers de",
    "artículos sobre",
    "articulos sobre",
    "estudios sobre",
    "evidencia sobre",
    "evidencia científica",
    "evidencia cientifica",
    "search papers",
    "find papers",
];

const ANALYZE_TRIGGERS: &[&str] = &["analiza", "analizar", "análisis", "analisis", "analyze"];

const RECOMMEND_TRIGGERS: &[&str] = &[
    "recomienda",
    "recomendar",
    "recomendación",
    "recomendacion",
    "recomendaciones",
    "qué hacer",
    "que hacer",
    "recommend",
];

const EVALUATE_TRIGGERS: &[&str] = &[
    "evalúa",
    "evalua",
    "evaluar",
    "evaluación",
    "evaluacion",
    "evaluate",
];

const HELP_TRIGGERS: &[&str] = &[
    "ayuda",
    "help",
    "comandos",
    "qué puedes hacer",
    "que puedes hacer",
];

/// Topic patterns, tried in order against the original text.
static TOPIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:busca|buscar|encuentra|encontrar)\s+(?:papers|art[ií]culos|estudios|evidencia)(?:\s+cient[ií]fic[oa]s?)?\s+(?:sobre|acerca\s+de|de|para|en)\s+(.+)",
        r"(?i)\b(?:papers|art[ií]culos|estudios|evidencia)(?:\s+cient[ií]fic[oa]s?)?\s+(?:sobre|acerca\s+de|de|para|en)\s+(.+)",
        r"(?i)\b(?:search|find)\s+papers\s+(?:on|about|for)\s+(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Any search trigger, case-insensitively.
static TRIGGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = SEARCH_TRIGGERS.iter().map(|t| regex::escape(t)).collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).unwrap()
});

/// Connectives left over after stripping a trigger phrase.
static LEADING_CONNECTIVES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:(?:acerca\s+de|sobre|de|para|en)\s+)+").unwrap());

/// Recognise a command, or `None` when no trigger phrase matches.
pub fn recognize(text: &str) -> Option<Command> {
    let lower = text.to_lowercase();
    let hit = |triggers: &[&str]| triggers.iter().any(|t| lower.contains(t));

    if hit(SEARCH_TRIGGERS) {
        Some(Command::Search {
            topic: extract_topic(text),
        })
    } else if hit(ANALYZE_TRIGGERS) {
        Some(Command::Analyze)
    } else if hit(RECOMMEND_TRIGGERS) {
        Some(Command::Recommend)
    } else if hit(EVALUATE_TRIGGERS) {
        Some(Command::Evaluate)
    } else if hit(HELP_TRIGGERS) {
        Some(Command::Help)
    } else {
        None
    }
}

/// Classify a message, falling back to [`Command::Help`].
pub fn classify(text: &str) -> Command {
    recognize(text).unwrap_or(Command::Help)
}

/// Pull the search topic out of a search request.
///
/// Tries each topic pattern in order and returns the first capture. Without
/// a pattern match, strips the known trigger phrases; if that leaves
/// nothing, the whole trimmed message is the topic.
pub fn extract_topic(text: &str) -> String {
    for pattern in TOPIC_PATTERNS.iter() {
        if let Some(topic) = pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
        {
            return topic.to_string();
        }
    }

    let stripped = strip_triggers(text);
    if !stripped.is_empty() {
        return stripped;
    }

    text.trim().to_string()
}

fn strip_triggers(text: &str) -> String {
    let rest = TRIGGER_PATTERN.replace_all(text, " ");
    let rest = rest.trim();
    LEADING_CONNECTIVES.replace(rest, "").trim().to_string()
}
