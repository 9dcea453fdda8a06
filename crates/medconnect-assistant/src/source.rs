//! Read access to the clinical form.
//!
//! The assistant never reaches into the page for field values; it is handed
//! a [`FormSource`] instead.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use medconnect_core::models::form::{FormField, FormSnapshot};

/// Something that can report the current value of a form field.
///
/// `None` means the field is not present, which callers treat as empty.
pub trait FormSource: Send + Sync {
    fn read(&self, field: FormField) -> Option<String>;
}

/// In-memory form, editable while the assistant is running.
#[derive(Debug, Default)]
pub struct MemoryForm {
    values: RwLock<HashMap<FormField, String>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (FormField, V)>,
        V: Into<String>,
    {
        let form = Self::new();
        for (field, value) in values {
            form.set(field, value);
        }
        form
    }

    pub fn set(&self, field: FormField, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field, value.into());
    }

    pub fn clear(&self, field: FormField) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&field);
    }
}

impl FormSource for MemoryForm {
    fn read(&self, field: FormField) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&field)
            .cloned()
    }
}

impl FormSource for FormSnapshot {
    fn read(&self, field: FormField) -> Option<String> {
        Some(self.get(field).to_string()).filter(|v| !v.is_empty())
    }
}
