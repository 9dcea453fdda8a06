use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A field of the clinical intake form.
///
/// Each variant maps to a stable element id in the dashboard markup. The
/// ids are the keys of a [`FormSnapshot`] and of the `contexto_clinico`
/// payload sent to the copilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FormField {
    #[serde(rename = "motivoConsulta")]
    ConsultationReason,
    #[serde(rename = "tipoAtencion")]
    CareType,
    #[serde(rename = "pacienteNombre")]
    PatientName,
    #[serde(rename = "pacienteRut")]
    PatientRut,
    #[serde(rename = "pacienteEdad")]
    PatientAge,
    #[serde(rename = "pacienteSexo")]
    PatientSex,
    #[serde(rename = "antecedentes")]
    History,
    #[serde(rename = "evaluacion")]
    Evaluation,
    #[serde(rename = "diagnostico")]
    Diagnosis,
    #[serde(rename = "tratamiento")]
    Treatment,
    #[serde(rename = "observaciones")]
    Notes,
}

impl FormField {
    /// Every observed field, in form order.
    pub const ALL: [FormField; 11] = [
        FormField::ConsultationReason,
        FormField::CareType,
        FormField::PatientName,
        FormField::PatientRut,
        FormField::PatientAge,
        FormField::PatientSex,
        FormField::History,
        FormField::Evaluation,
        FormField::Diagnosis,
        FormField::Treatment,
        FormField::Notes,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            FormField::ConsultationReason => "motivoConsulta",
            FormField::CareType => "tipoAtencion",
            FormField::PatientName => "pacienteNombre",
            FormField::PatientRut => "pacienteRut",
            FormField::PatientAge => "pacienteEdad",
            FormField::PatientSex => "pacienteSexo",
            FormField::History => "antecedentes",
            FormField::Evaluation => "evaluacion",
            FormField::Diagnosis => "diagnostico",
            FormField::Treatment => "tratamiento",
            FormField::Notes => "observaciones",
        }
    }

    /// Human-readable label as shown on the form.
    pub fn label(self) -> &'static str {
        match self {
            FormField::ConsultationReason => "Motivo de consulta",
            FormField::CareType => "Tipo de atención",
            FormField::PatientName => "Nombre del paciente",
            FormField::PatientRut => "RUT",
            FormField::PatientAge => "Edad",
            FormField::PatientSex => "Sexo",
            FormField::History => "Antecedentes",
            FormField::Evaluation => "Evaluación",
            FormField::Diagnosis => "Diagnóstico",
            FormField::Treatment => "Tratamiento",
            FormField::Notes => "Observaciones",
        }
    }
}

impl FromStr for FormField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.element_id() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// Current values of the clinical form, keyed by element id.
///
/// Only the latest snapshot is meaningful; observers replace it wholesale
/// on every change. Absent fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormSnapshot(BTreeMap<String, String>);

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(field, value)` pairs. Later pairs win.
    pub fn from_fields<I, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (FormField, V)>,
        V: Into<String>,
    {
        let mut snapshot = Self::new();
        for (field, value) in pairs {
            snapshot.set(field, value);
        }
        snapshot
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.0.insert(field.element_id().to_string(), value.into());
    }

    pub fn get(&self, field: FormField) -> &str {
        self.value(field.element_id())
    }

    /// Look up a value by raw element id.
    pub fn value(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn consultation_reason(&self) -> &str {
        self.get(FormField::ConsultationReason).trim()
    }

    pub fn care_type(&self) -> &str {
        self.get(FormField::CareType).trim()
    }

    /// Both the consultation reason and the care type are filled in.
    ///
    /// Every command except help requires this before reaching the backend.
    pub fn is_sufficient(&self) -> bool {
        !self.consultation_reason().is_empty() && !self.care_type().is_empty()
    }

    /// Non-empty `(field, value)` pairs in form order.
    pub fn filled(&self) -> impl Iterator<Item = (FormField, &str)> {
        FormField::ALL
            .into_iter()
            .map(|f| (f, self.get(f).trim()))
            .filter(|(_, v)| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cheap digest of the key/value content, used to skip no-op updates.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}

impl FromIterator<(String, String)> for FormSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
