use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;

use crate::constants::{LAST_PROVIDER_KEY, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME};
use crate::models::ProviderConfig;

/// Key-value JSON document holding one entry per provider id plus the
/// `lastProvider` key. Every read goes back to disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_provider(&self, provider_id: &str) -> Option<ProviderConfig> {
        let document = self.read_document().await;
        let value = document.get(provider_id)?.clone();
        match serde_json::from_value(value) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(provider_id, %err, "ignoring malformed provider settings");
                None
            }
        }
    }

    pub async fn save_provider(
        &self,
        provider_id: &str,
        config: &ProviderConfig,
    ) -> Result<(), String> {
        let value = serde_json::to_value(config)
            .map_err(|err| format!("Unable to serialise provider settings: {}", err))?;
        self.set(provider_id, value).await
    }

    pub async fn last_provider(&self) -> Option<String> {
        self.read_document()
            .await
            .get(LAST_PROVIDER_KEY)
            .and_then(Value::as_str)
            .map(|value| value.to_string())
    }

    pub async fn set_last_provider(&self, provider_id: &str) -> Result<(), String> {
        self.set(LAST_PROVIDER_KEY, Value::String(provider_id.to_string()))
            .await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), String> {
        let mut document = self.read_document().await;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }

    async fn read_document(&self) -> Map<String, Value> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(_) => return Map::new(),
        };

        if contents.trim().is_empty() {
            return Map::new();
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "settings file is not a JSON object, starting empty");
                Map::new()
            }
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|err| {
                format!(
                    "Unable to create settings directory '{}': {}",
                    parent.display(),
                    err
                )
            })?;
        }

        let payload = serde_json::to_string_pretty(document)
            .map_err(|err| format!("Unable to serialise settings: {}", err))?;

        fs::write(&self.path, payload).await.map_err(|err| {
            format!(
                "Unable to write settings file '{}': {}",
                self.path.display(),
                err
            )
        })
    }
}
