use medconnect_assistant::classifier::{classify, extract_topic, recognize};
use medconnect_core::models::command::Command;

fn topic_of(text: &str) -> String {
    match classify(text) {
        Command::Search { topic } => topic,
        other => panic!("expected search for {text:?}, got {other:?}"),
    }
}

#[test]
fn search_phrases_capture_topic() {
    assert_eq!(topic_of("busca papers de tendinitis de hombro"), "tendinitis de hombro");
    assert_eq!(topic_of("Buscar papers sobre lumbalgia crónica"), "lumbalgia crónica");
    assert_eq!(topic_of("papers sobre  fascitis plantar  "), "fascitis plantar");
    assert_eq!(topic_of("busca evidencia científica sobre esguince de tobillo"), "esguince de tobillo");
    assert_eq!(topic_of("artículos sobre rehabilitación de LCA"), "rehabilitación de LCA");
    assert_eq!(topic_of("search papers about rotator cuff"), "rotator cuff");
}

#[test]
fn search_is_checked_before_analysis() {
    assert_eq!(
        topic_of("busca papers sobre análisis de la marcha"),
        "análisis de la marcha"
    );
}

#[test]
fn topic_falls_back_to_stripping_triggers() {
    assert_eq!(extract_topic("busca papers   epicondilitis"), "epicondilitis");
}

#[test]
fn stripped_topic_keeps_original_casing() {
    assert_eq!(extract_topic("busca papers   LCA"), "LCA");
    assert_eq!(extract_topic("Busca Papers Rotura del LCA"), "Rotura del LCA");
}

#[test]
fn topic_falls_back_to_whole_message() {
    assert_eq!(extract_topic("  busca papers  "), "busca papers");
}

#[test]
fn analysis_commands_are_recognised() {
    assert_eq!(classify("analizar el caso"), Command::Analyze);
    assert_eq!(classify("Haz un ANÁLISIS del paciente"), Command::Analyze);
    assert_eq!(classify("recomienda un tratamiento"), Command::Recommend);
    assert_eq!(classify("¿qué hacer con este paciente?"), Command::Recommend);
    assert_eq!(classify("evalúa al paciente"), Command::Evaluate);
    assert_eq!(classify("necesito una evaluación"), Command::Evaluate);
}

#[test]
fn help_is_recognised_and_is_the_fallback() {
    assert_eq!(recognize("ayuda"), Some(Command::Help));
    assert_eq!(classify("ayuda"), Command::Help);
    assert_eq!(recognize("hola, buenos días"), None);
    assert_eq!(classify("hola, buenos días"), Command::Help);
}
