//! Formatting of copilot results as chat text.
//!
//! Output uses the light markdown subset the dashboard chat understands:
//! `**bold**`, `[text](url)` links, `•` bullets and emoji markers. Every
//! function here is pure: the same input always yields the same text.

use std::sync::LazyLock;

use regex::Regex;

use medconnect_core::models::analysis::{ClinicalAnalysis, NlpAnalysis};
use medconnect_core::models::command::{Command, CommandResult};
use medconnect_core::models::evidence::Paper;

/// Papers shown per response; the rest are summarised in a footer.
pub const MAX_PAPERS: usize = 5;

/// Authors listed before collapsing into "et al.".
pub const MAX_AUTHORS: usize = 3;

/// Abstract excerpt length, in characters.
pub const EXCERPT_CHARS: usize = 200;

pub const EVIDENCE_HEADER: &str = "📚 **Papers científicos encontrados:**";

pub const HELP_TEXT: &str = "\
🤖 **Comandos disponibles del asistente:**

🔍 **Buscar evidencia:** \"busca papers sobre tendinitis de hombro\"
🧠 **Analizar el caso:** \"analiza el caso\"
💡 **Recomendaciones:** \"recomienda un tratamiento\"
📋 **Evaluar al paciente:** \"evalúa al paciente\"

Completa *Motivo de consulta* y *Tipo de atención* para habilitar el análisis.";

pub const INSUFFICIENT_CONTEXT_TEXT: &str =
    "⚠️ Completa el motivo de consulta y el tipo de atención antes de usar el asistente.";

pub const BUSY_TEXT: &str = "⏳ Ya hay una solicitud en curso. Espera a que termine.";

/// Render a command's result.
pub fn render_result(command: &Command, result: &CommandResult) -> String {
    match command {
        Command::Search { .. } => render_evidence(&result.evidence),
        Command::Analyze => render_analysis("🧠 **Análisis clínico:**", result),
        Command::Evaluate => render_analysis("📋 **Evaluación clínica:**", result),
        Command::Recommend if !result.recommendations.is_empty() => {
            let mut out = String::from("💡 **Recomendaciones clínicas:**\n");
            push_bullets(&mut out, &result.recommendations);
            if !result.patient_education.is_empty() {
                out.push_str("\n📋 **Educación al paciente:**\n");
                push_bullets(&mut out, &result.patient_education);
            }
            out.trim_end().to_string()
        }
        Command::Recommend => render_analysis("💡 **Recomendaciones clínicas:**", result),
        Command::Help => HELP_TEXT.to_string(),
    }
}

/// Message shown when a command came back with nothing to render.
pub fn render_no_results(command: &Command) -> String {
    match command {
        Command::Search { topic } => {
            format!("🔍 No se encontraron papers científicos para \"{topic}\".")
        }
        _ => "ℹ️ El análisis no devolvió resultados para este caso.".to_string(),
    }
}

pub fn render_error(detail: &str) -> String {
    format!("❌ Error al procesar la solicitud: {detail}")
}

/// Render an evidence list, capped at [`MAX_PAPERS`] entries.
pub fn render_evidence(papers: &[Paper]) -> String {
    let mut out = String::from(EVIDENCE_HEADER);
    out.push_str("\n\n");

    for (i, paper) in papers.iter().take(MAX_PAPERS).enumerate() {
        out.push_str(&render_paper(i + 1, paper));
        out.push('\n');
    }

    if papers.len() > MAX_PAPERS {
        out.push_str(&format!(
            "_Mostrando {MAX_PAPERS} de {} resultados._\n",
            papers.len()
        ));
    }

    out.trim_end().to_string()
}

fn render_paper(position: usize, paper: &Paper) -> String {
    let mut out = format!("**{position}. {}**\n", paper.title.trim());

    let authors = format_authors(&paper.authors);
    if !authors.is_empty() {
        out.push_str(&format!("👥 {authors}\n"));
    }

    let citation = format_citation(paper);
    if !citation.is_empty() {
        out.push_str(&format!("📖 {citation}\n"));
    }

    if let Some(doi) = paper.resolvable_doi() {
        out.push_str(&format!("🔗 DOI: [{doi}](https://doi.org/{doi})\n"));
    }

    if paper.relevance_score > 0.0 {
        out.push_str(&format!(
            "⭐ Relevancia: {}%\n",
            percent(paper.relevance_score)
        ));
    }

    let excerpt = excerpt(&paper.abstract_text);
    if !excerpt.is_empty() {
        out.push_str(&format!("📝 {excerpt}\n"));
    }

    out
}

/// First [`MAX_AUTHORS`] authors, with "et al." when there are more.
pub fn format_authors(authors: &[String]) -> String {
    let shown: Vec<&str> = authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();

    let mut out = shown
        .iter()
        .take(MAX_AUTHORS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if shown.len() > MAX_AUTHORS {
        out.push_str(" et al.");
    }
    out
}

/// `Journal (Year); volume(issue):pages`, omitting whatever is missing.
fn format_citation(paper: &Paper) -> String {
    let mut out = paper.journal.trim().to_string();

    if let Some(year) = &paper.year {
        let year = year.to_string();
        if !year.is_empty() {
            if out.is_empty() {
                out = year;
            } else {
                out.push_str(&format!(" ({year})"));
            }
        }
    }

    let volume = paper.volume.as_deref().map(str::trim).unwrap_or("");
    let issue = paper.issue.as_deref().map(str::trim).unwrap_or("");
    let pages = paper.pages.as_deref().map(str::trim).unwrap_or("");

    if !volume.is_empty() || !pages.is_empty() {
        let mut locator = volume.to_string();
        if !issue.is_empty() {
            locator.push_str(&format!("({issue})"));
        }
        if !pages.is_empty() {
            if !locator.is_empty() {
                locator.push(':');
            }
            locator.push_str(pages);
        }
        if out.is_empty() {
            out = locator;
        } else {
            out.push_str(&format!("; {locator}"));
        }
    }

    out
}

/// Whitespace-collapsed abstract cut to [`EXCERPT_CHARS`], ending in "...".
pub fn excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return String::new();
    }
    let cut: String = collapsed.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// Render an analysis response under `header`.
pub fn render_analysis(header: &str, result: &CommandResult) -> String {
    let mut out = format!("{header}\n");

    if let Some(analysis) = &result.clinical_analysis
        && let Some(summary) = analysis.summary.as_deref().map(str::trim)
        && !summary.is_empty()
    {
        out.push_str(summary);
        out.push('\n');
    }

    if let Some(nlp) = &result.nlp_analysis {
        push_nlp(&mut out, nlp);
    }

    if let Some(analysis) = &result.clinical_analysis {
        push_clinical(&mut out, analysis);
    }

    if !result.recommendations.is_empty() {
        out.push_str("\n💡 **Recomendaciones:**\n");
        push_bullets(&mut out, &result.recommendations);
    }

    if !result.patient_education.is_empty() {
        out.push_str("\n📋 **Educación al paciente:**\n");
        push_bullets(&mut out, &result.patient_education);
    }

    if !result.evidence.is_empty() {
        out.push('\n');
        out.push_str(&render_evidence(&result.evidence));
    }

    out.trim_end().to_string()
}

fn push_nlp(out: &mut String, nlp: &NlpAnalysis) {
    if !nlp.keywords.is_empty() {
        let keywords = nlp
            .keywords
            .iter()
            .map(|k| format!("{} ({}%)", k.term.trim(), percent(k.confidence)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\n🔑 **Palabras clave:** {keywords}\n"));
    }
    if !nlp.symptoms.is_empty() {
        out.push_str(&format!(
            "🩺 **Síntomas identificados:** {}\n",
            nlp.symptoms.join(", ")
        ));
    }
    if !nlp.entities.is_empty() {
        out.push_str(&format!(
            "🏷️ **Entidades clínicas:** {}\n",
            nlp.entities.join(", ")
        ));
    }
}

fn push_clinical(out: &mut String, analysis: &ClinicalAnalysis) {
    if let Some(confidence) = analysis.confidence {
        out.push_str(&format!(
            "📊 **Confianza del análisis:** {}%\n",
            percent(confidence)
        ));
    }

    let Some(report) = analysis.report.as_deref().map(str::trim) else {
        return;
    };
    if report.is_empty() {
        return;
    }

    let sections = extract_sections(report);
    out.push('\n');
    if sections.is_empty() {
        out.push_str(report);
        out.push('\n');
        return;
    }
    for (kind, body) in sections {
        out.push_str(&format!("**{}**\n{body}\n\n", kind.label()));
    }
}

fn push_bullets(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str(&format!("• {item}\n"));
    }
}

/// Confidence as a whole percentage. Values above 1 are taken as already
/// being percentages.
pub fn percent(value: f64) -> i64 {
    let scaled = if value > 1.0 { value } else { value * 100.0 };
    scaled.clamp(0.0, 100.0).round() as i64
}

/// A labelled part of a structured clinical report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Introduction,
    Evaluation,
    Diagnosis,
    Treatment,
    Closing,
    References,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Introduction => "📝 Introducción",
            SectionKind::Evaluation => "🔍 Evaluación",
            SectionKind::Diagnosis => "🩺 Diagnóstico",
            SectionKind::Treatment => "💊 Tratamiento",
            SectionKind::Closing => "✅ Cierre",
            SectionKind::References => "📚 Referencias",
        }
    }

    fn from_heading(heading: &str) -> Option<Self> {
        let normalized: String = heading
            .trim()
            .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();

        const PREFIXES: &[(&str, SectionKind)] = &[
            ("introduc", SectionKind::Introduction),
            ("evaluac", SectionKind::Evaluation),
            ("evaluation", SectionKind::Evaluation),
            ("assessment", SectionKind::Evaluation),
            ("diagnos", SectionKind::Diagnosis),
            ("tratamiento", SectionKind::Treatment),
            ("treatment", SectionKind::Treatment),
            ("cierre", SectionKind::Closing),
            ("closing", SectionKind::Closing),
            ("conclus", SectionKind::Closing),
            ("referencias", SectionKind::References),
            ("references", SectionKind::References),
            ("bibliograf", SectionKind::References),
        ];

        PREFIXES
            .iter()
            .find(|(prefix, _)| normalized.starts_with(prefix))
            .map(|(_, kind)| *kind)
    }
}

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]*(.+?)[ \t#:]*$").unwrap());

/// Split a markdown report into its recognised sections, in document order.
///
/// A section's body runs from its heading to the next heading of any kind.
/// Unrecognised headings end the previous section and are dropped along
/// with their body. Sections with an empty body are skipped.
pub fn extract_sections(report: &str) -> Vec<(SectionKind, String)> {
    let headings: Vec<_> = HEADING
        .captures_iter(report)
        .filter_map(|c| {
            let whole = c.get(0)?;
            let title = c.get(1)?;
            Some((whole.start(), whole.end(), title.as_str()))
        })
        .collect();

    let mut sections = Vec::new();
    for (i, (_, body_start, title)) in headings.iter().enumerate() {
        let Some(kind) = SectionKind::from_heading(title) else {
            continue;
        };
        let body_end = headings
            .get(i + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(report.len());
        let body = report[*body_start..body_end].trim();
        if !body.is_empty() {
            sections.push((kind, body.to_string()));
        }
    }
    sections
}

/// Free-form copilot chat reply.
pub fn render_chat_reply(reply: &str) -> String {
    format!("🤖 {}", reply.trim())
}
