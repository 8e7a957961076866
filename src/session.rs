use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_NAME_PREFIX;
use crate::models::{GenerateImageRequest, ProviderConfig};
use crate::providers::Provider;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_CANCELLED: &str = "Cancelled";
const BUSY_MESSAGE: &str = "Another operation is in progress.";

/// Interface-owned state handed by reference into every command.
#[derive(Debug, Clone)]
pub struct Session {
    provider: Provider,
    config: ProviderConfig,
    image_dir: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    name_prefix: String,
    status: String,
    busy: bool,
}

impl Session {
    pub fn new(provider: Provider, config: ProviderConfig) -> Self {
        Self {
            provider,
            config,
            image_dir: None,
            save_dir: None,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            status: STATUS_READY.to_string(),
            busy: false,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub(crate) fn set_provider(&mut self, provider: Provider, config: ProviderConfig) {
        self.provider = provider;
        self.config = config;
    }

    pub(crate) fn config_mut(&mut self) -> &mut ProviderConfig {
        &mut self.config
    }

    pub fn image_dir(&self) -> Option<&Path> {
        self.image_dir.as_deref()
    }

    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    /// Applies a directory picker result. `None` means the user cancelled and
    /// leaves the current selection alone. Returns whether a directory was set.
    pub fn choose_image_dir(&mut self, choice: Option<PathBuf>) -> bool {
        match choice {
            Some(dir) => {
                self.image_dir = Some(dir);
                true
            }
            None => {
                self.status = STATUS_CANCELLED.to_string();
                false
            }
        }
    }

    pub fn choose_save_dir(&mut self, choice: Option<PathBuf>) -> bool {
        match choice {
            Some(dir) => {
                self.save_dir = Some(dir);
                true
            }
            None => {
                self.status = STATUS_CANCELLED.to_string();
                false
            }
        }
    }

    /// Save directory when one was chosen, else the browsed image directory.
    pub fn output_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref().or(self.image_dir.as_deref())
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn set_name_prefix(&mut self, prefix: &str) {
        let trimmed = prefix.trim();
        self.name_prefix = if trimmed.is_empty() {
            DEFAULT_NAME_PREFIX.to_string()
        } else {
            trimmed.to_string()
        };
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Marks an action as in flight. Fails while another one is running.
    pub fn begin(&mut self, status: impl Into<String>) -> Result<(), String> {
        if self.busy {
            return Err(BUSY_MESSAGE.to_string());
        }
        self.busy = true;
        self.status = status.into();
        Ok(())
    }

    pub fn finish(&mut self, status: impl Into<String>) {
        self.busy = false;
        self.status = status.into();
    }

    pub fn generation_request(&self, prompt: &str) -> GenerateImageRequest {
        GenerateImageRequest {
            prompt: prompt.to_string(),
            base_url: self.config.base_url.clone(),
            api_key: self.config.api_key.clone(),
            model: self.config.model.clone(),
            output_dir: self
                .output_dir()
                .map(|dir| dir.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name_prefix: Some(self.name_prefix.clone()),
        }
    }
}
