use std::sync::Arc;

use medconnect_assistant::{FormObserver, MemoryForm};
use medconnect_core::models::form::FormField;

#[test]
fn snapshot_covers_every_field() {
    let form = Arc::new(MemoryForm::with_values([(FormField::PatientName, "Ana Rojas")]));
    let observer = FormObserver::new(form);

    let snapshot = observer.snapshot();
    assert_eq!(snapshot.len(), FormField::ALL.len());
    assert_eq!(snapshot.value("pacienteNombre"), "Ana Rojas");
    assert_eq!(snapshot.value("diagnostico"), "");
    assert!(!observer.has_sufficient_context());
}

#[test]
fn refresh_reports_only_real_changes() {
    let form = Arc::new(MemoryForm::new());
    let observer = FormObserver::new(form.clone());
    let mut changes = observer.subscribe();

    assert!(!observer.refresh());
    assert!(!changes.has_changed().unwrap());

    form.set(FormField::ConsultationReason, "lumbago agudo");
    form.set(FormField::CareType, "kinesiologia");
    assert!(observer.refresh());
    assert!(changes.has_changed().unwrap());
    assert_eq!(
        changes.borrow_and_update().consultation_reason(),
        "lumbago agudo"
    );
    assert!(observer.has_sufficient_context());

    assert!(!observer.refresh());
    assert!(!changes.has_changed().unwrap());

    form.clear(FormField::CareType);
    assert!(observer.refresh());
    assert!(!observer.has_sufficient_context());
}
