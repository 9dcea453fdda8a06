use medconnect_core::models::analysis::AnalyzeResponse;
use medconnect_core::models::chat::ChatRole;
use medconnect_core::models::command::{Command, CommandResult};
use medconnect_core::models::evidence::{Paper, PublicationYear, SearchResponse};
use medconnect_core::models::form::{FormField, FormSnapshot};
use medconnect_core::models::text_list::TextList;

#[test]
fn snapshot_requires_reason_and_care_type() {
    let empty = FormSnapshot::new();
    assert!(!empty.is_sufficient());

    let reason_only = FormSnapshot::from_fields([(FormField::ConsultationReason, "dolor de hombro")]);
    assert!(!reason_only.is_sufficient());

    let blank_care = FormSnapshot::from_fields([
        (FormField::ConsultationReason, "dolor de hombro"),
        (FormField::CareType, "   "),
    ]);
    assert!(!blank_care.is_sufficient());

    let full = FormSnapshot::from_fields([
        (FormField::ConsultationReason, "dolor de hombro"),
        (FormField::CareType, "kinesiologia"),
    ]);
    assert!(full.is_sufficient());
}

#[test]
fn missing_field_reads_as_empty() {
    let snapshot = FormSnapshot::from_fields([(FormField::CareType, "medicina general")]);
    assert_eq!(snapshot.get(FormField::Diagnosis), "");
    assert_eq!(snapshot.value("noExiste"), "");
}

#[test]
fn snapshot_serializes_as_flat_map_of_element_ids() {
    let snapshot = FormSnapshot::from_fields([
        (FormField::ConsultationReason, "lumbago"),
        (FormField::PatientAge, "54"),
    ]);
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "motivoConsulta": "lumbago", "pacienteEdad": "54" })
    );
}

#[test]
fn content_hash_tracks_content() {
    let a = FormSnapshot::from_fields([(FormField::Notes, "uno")]);
    let b = FormSnapshot::from_fields([(FormField::Notes, "uno")]);
    let c = FormSnapshot::from_fields([(FormField::Notes, "dos")]);
    assert_eq!(a.content_hash(), b.content_hash());
    assert_ne!(a.content_hash(), c.content_hash());
}

#[test]
fn form_field_parses_element_ids() {
    for field in FormField::ALL {
        assert_eq!(field.element_id().parse::<FormField>().unwrap(), field);
    }
    assert!("campoInventado".parse::<FormField>().is_err());
}

#[test]
fn chat_role_round_trips_through_str() {
    for role in [
        ChatRole::User,
        ChatRole::System,
        ChatRole::Info,
        ChatRole::Warning,
        ChatRole::Error,
        ChatRole::Success,
    ] {
        assert_eq!(role.as_str().parse::<ChatRole>().unwrap(), role);
    }
}

#[test]
fn text_list_accepts_array_or_string() {
    let many: TextList = serde_json::from_str(r#"["Reposo", "  ", "Hielo local"]"#).unwrap();
    assert_eq!(many.items(), vec!["Reposo", "Hielo local"]);

    let one: TextList = serde_json::from_str(r#""- Reposo\n• Hielo local\n""#).unwrap();
    assert_eq!(one.items(), vec!["Reposo", "Hielo local"]);
}

#[test]
fn paper_accepts_numeric_or_text_year_and_camel_case_score() {
    let paper: Paper = serde_json::from_str(
        r#"{"title":"T","authors":["A"],"journal":"J","year":2021,"abstract":"x","relevanceScore":0.8}"#,
    )
    .unwrap();
    assert_eq!(paper.year, Some(PublicationYear::Number(2021)));
    assert_eq!(paper.relevance_score, 0.8);

    let paper: Paper = serde_json::from_str(r#"{"title":"T","year":"2019 Mar","doi":"Sin DOI"}"#).unwrap();
    assert_eq!(paper.year.as_ref().unwrap().to_string(), "2019 Mar");
    assert_eq!(paper.resolvable_doi(), None);
}

#[test]
fn null_paper_fields_do_not_sink_the_search() {
    let response: SearchResponse = serde_json::from_str(
        r#"{"success":true,"evidence":[
            {"title":"Tendinopatía","authors":null,"journal":null,"year":2021.0,
             "abstract":null,"relevance_score":null,"doi":null},
            {"title":"Manguito rotador","journal":"J Shoulder","year":2019}
        ]}"#,
    )
    .unwrap();

    assert_eq!(response.evidence.len(), 2);
    let first = &response.evidence[0];
    assert_eq!(first.journal, "");
    assert!(first.authors.is_empty());
    assert_eq!(first.abstract_text, "");
    assert_eq!(first.relevance_score, 0.0);
    assert_eq!(first.year.as_ref().unwrap().to_string(), "2021");
    assert_eq!(response.evidence[1].journal, "J Shoulder");

    let response: SearchResponse =
        serde_json::from_str(r#"{"success":null,"evidence":null}"#).unwrap();
    assert!(!response.success);
    assert!(response.evidence.is_empty());
}

#[test]
fn null_keyword_confidence_reads_as_zero() {
    let response: AnalyzeResponse = serde_json::from_value(serde_json::json!({
        "success": true,
        "nlp_analysis": {
            "keywords": [{ "term": "hombro", "confidence": null }, { "keyword": "dolor" }],
            "symptoms": null
        }
    }))
    .unwrap();

    let nlp = response.nlp_analysis.unwrap();
    assert_eq!(nlp.keywords.len(), 2);
    assert_eq!(nlp.keywords[0].confidence, 0.0);
    assert_eq!(nlp.keywords[1].term, "dolor");
    assert!(nlp.symptoms.is_empty());
}

#[test]
fn command_result_prefers_top_level_recommendations() {
    let response: AnalyzeResponse = serde_json::from_value(serde_json::json!({
        "success": true,
        "clinical_analysis": { "summary": "s", "recommendations": ["de analisis"] },
        "recommendations": "Control en 2 semanas",
        "patient_education": ["Evitar cargas"]
    }))
    .unwrap();

    let result = CommandResult::from(response);
    assert!(result.success);
    assert_eq!(result.recommendations, vec!["Control en 2 semanas"]);
    assert_eq!(result.patient_education, vec!["Evitar cargas"]);
}

#[test]
fn command_result_falls_back_to_analysis_recommendations() {
    let response: AnalyzeResponse = serde_json::from_value(serde_json::json!({
        "success": true,
        "clinical_analysis": { "recommendations": ["Ecografia de hombro"] }
    }))
    .unwrap();

    let result = CommandResult::from(response);
    assert_eq!(result.recommendations, vec!["Ecografia de hombro"]);
}

#[test]
fn empty_search_response_is_empty_result() {
    let result = CommandResult::from(SearchResponse {
        success: true,
        ..SearchResponse::default()
    });
    assert!(result.is_empty());
}

#[test]
fn only_help_skips_context() {
    assert!(!Command::Help.needs_context());
    assert!(Command::Analyze.needs_context());
    assert!(Command::Search { topic: "x".into() }.needs_context());
}
