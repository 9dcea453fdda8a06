//! Clinical form loaded from a JSON file of `elementId → value` pairs.

use std::path::Path;

use medconnect_assistant::MemoryForm;
use medconnect_core::models::form::FormField;

/// Read a form file. Keys must be known element ids; values must be
/// strings or numbers.
pub fn load_form(path: &Path) -> eyre::Result<MemoryForm> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read form at {}: {e}", path.display()))?;
    parse_form(&contents)
}

pub fn parse_form(contents: &str) -> eyre::Result<MemoryForm> {
    let json: serde_json::Map<String, serde_json::Value> = serde_json::from_str(contents)?;

    let form = MemoryForm::new();
    for (key, value) in json {
        let field: FormField = key.parse()?;
        let value = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Null => continue,
            other => {
                return Err(eyre::eyre!(
                    "form field {key} must be a string or number, got {other}"
                ));
            }
        };
        form.set(field, value);
    }
    Ok(form)
}
