use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use medconnect_assistant::AssistantOptions;
use medconnect_core::endpoints::DEFAULT_BASE_URL;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Overrides `base_url` from the config file.
pub const BASE_URL_ENV: &str = "MEDCONNECT_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedConnectConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Dashboard origin the copilot endpoints are joined onto.
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub auto_mode: bool,
    #[serde(default = "default_auto_debounce_ms")]
    pub auto_debounce_ms: u64,
    #[serde(default)]
    pub chat_fallback: bool,
    #[serde(default)]
    pub json_logs: bool,
    /// Added in v1; older configs are stamped with the migration time.
    pub created_at: jiff::Timestamp,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_auto_debounce_ms() -> u64 {
    1000
}

impl Default for MedConnectConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            auto_mode: false,
            auto_debounce_ms: default_auto_debounce_ms(),
            chat_fallback: false,
            json_logs: false,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl MedConnectConfig {
    /// Replace the base URL when `value` is set and non-blank.
    pub fn override_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(base_url = %url, "base url overridden");
            self.base_url = url.trim().to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn assistant_options(&self) -> AssistantOptions {
        AssistantOptions {
            auto_mode: self.auto_mode,
            auto_debounce: Duration::from_millis(self.auto_debounce_ms),
            chat_fallback: self.chat_fallback,
        }
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.medconnect.cli"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, or defaults when there is no file yet.
pub fn load_or_default(path: &Path) -> eyre::Result<MedConnectConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(MedConnectConfig::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> eyre::Result<MedConnectConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: MedConnectConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update medconnect."
        ));
    }

    // v0 → v1: `server_url` became `base_url`, and `created_at` was added.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(url) = obj.remove("server_url") {
            obj.entry("base_url").or_insert(url);
        }
        obj.entry("base_url")
            .or_insert(serde_json::Value::String(DEFAULT_BASE_URL.to_string()));
        obj.entry("created_at")
            .or_insert(serde_json::to_value(jiff::Timestamp::now())?);
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (base_url, created_at)");
    }

    Ok(json)
}

/// Write `config` to `path` atomically, stamped with the current version.
pub fn save_config(path: &Path, config: &MedConnectConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
