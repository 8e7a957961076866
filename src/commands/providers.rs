use imagesapi::utils::normalize_base_url;

use crate::models::ProviderConfig;
use crate::providers::{Provider, ProviderPreset, resolve_provider_config};
use crate::session::Session;
use crate::settings::SettingsStore;

/// Field edits coming from the interface. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProviderEdit {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

pub fn provider_catalog() -> Vec<(Provider, ProviderPreset)> {
    Provider::ALL
        .into_iter()
        .map(|provider| (provider, provider.preset()))
        .collect()
}

pub async fn load_provider_config(store: &SettingsStore, provider: Provider) -> ProviderConfig {
    let stored = store.load_provider(provider.id()).await;
    resolve_provider_config(provider.id(), stored.as_ref())
}

/// Startup: the last selected provider, or the first preset.
pub async fn restore_session(store: &SettingsStore) -> Session {
    let provider = store
        .last_provider()
        .await
        .map(|id| Provider::from_id_or_custom(&id))
        .unwrap_or(Provider::ALL[0]);

    let config = load_provider_config(store, provider).await;
    Session::new(provider, config)
}

/// Saves the outgoing provider's fields, then loads the incoming one. A
/// failed save is logged and does not stop the switch.
pub async fn switch_provider(
    session: &mut Session,
    store: &SettingsStore,
    provider_id: &str,
) -> ProviderConfig {
    let outgoing = session.provider();
    if let Err(err) = store.save_provider(outgoing.id(), session.config()).await {
        tracing::warn!(provider = outgoing.id(), error = %err, "could not persist provider settings");
    }

    let incoming = Provider::from_id_or_custom(provider_id);
    let config = load_provider_config(store, incoming).await;
    session.set_provider(incoming, config.clone());

    if let Err(err) = store.set_last_provider(incoming.id()).await {
        tracing::warn!(provider = incoming.id(), error = %err, "could not persist last provider");
    }

    tracing::info!(from = outgoing.id(), to = incoming.id(), "switched provider");
    config
}

/// Applies field edits to the current provider and persists them right away.
pub async fn update_provider_config(
    session: &mut Session,
    store: &SettingsStore,
    edit: ProviderEdit,
) -> Result<ProviderConfig, String> {
    let config = session.config_mut();
    if let Some(base_url) = edit.base_url {
        config.base_url = normalize_base_url(&base_url);
    }
    if let Some(api_key) = edit.api_key {
        config.api_key = api_key.trim().to_string();
    }
    if let Some(model) = edit.model {
        config.model = model.trim().to_string();
    }

    let config = config.clone();
    let provider = session.provider();
    store.save_provider(provider.id(), &config).await?;
    store.set_last_provider(provider.id()).await?;
    Ok(config)
}
