use crate::models::ProviderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ProviderPreset {
    pub label: &'static str,
    pub base_url: &'static str,
    pub default_model: &'static str,
    pub models: &'static [ModelOption],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    SiliconFlow,
    Together,
    LocalAi,
    Custom,
}

const OPENAI_MODELS: &[ModelOption] = &[
    ModelOption { id: "gpt-image-1", label: "GPT Image 1" },
    ModelOption { id: "dall-e-3", label: "DALL·E 3" },
    ModelOption { id: "dall-e-2", label: "DALL·E 2" },
];

const SILICONFLOW_MODELS: &[ModelOption] = &[
    ModelOption { id: "Kwai-Kolors/Kolors", label: "Kolors" },
    ModelOption { id: "black-forest-labs/FLUX.1-schnell", label: "FLUX.1 schnell" },
    ModelOption { id: "stabilityai/stable-diffusion-3-5-large", label: "Stable Diffusion 3.5 Large" },
];

const TOGETHER_MODELS: &[ModelOption] = &[
    ModelOption { id: "black-forest-labs/FLUX.1-schnell-Free", label: "FLUX.1 schnell (free)" },
    ModelOption { id: "black-forest-labs/FLUX.1-dev", label: "FLUX.1 dev" },
];

const LOCALAI_MODELS: &[ModelOption] = &[
    ModelOption { id: "stablediffusion", label: "Stable Diffusion (local)" },
];

const CUSTOM_MODELS: &[ModelOption] = &[ModelOption { id: "", label: "Enter a model name" }];

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::OpenAi,
        Provider::SiliconFlow,
        Provider::Together,
        Provider::LocalAi,
        Provider::Custom,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::SiliconFlow => "siliconflow",
            Provider::Together => "together",
            Provider::LocalAi => "localai",
            Provider::Custom => "custom",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|provider| provider.id().eq_ignore_ascii_case(id))
    }

    /// Unknown identifiers resolve to [`Provider::Custom`].
    pub fn from_id_or_custom(id: &str) -> Self {
        Self::from_id(id).unwrap_or(Provider::Custom)
    }

    pub fn preset(self) -> ProviderPreset {
        match self {
            Provider::OpenAi => ProviderPreset {
                label: "OpenAI",
                base_url: "https://api.openai.com/v1",
                default_model: "gpt-image-1",
                models: OPENAI_MODELS,
            },
            Provider::SiliconFlow => ProviderPreset {
                label: "SiliconFlow",
                base_url: "https://api.siliconflow.cn/v1",
                default_model: "Kwai-Kolors/Kolors",
                models: SILICONFLOW_MODELS,
            },
            Provider::Together => ProviderPreset {
                label: "Together AI",
                base_url: "https://api.together.xyz/v1",
                default_model: "black-forest-labs/FLUX.1-schnell-Free",
                models: TOGETHER_MODELS,
            },
            Provider::LocalAi => ProviderPreset {
                label: "LocalAI",
                base_url: "http://localhost:8080/v1",
                default_model: "stablediffusion",
                models: LOCALAI_MODELS,
            },
            Provider::Custom => ProviderPreset {
                label: "Custom",
                base_url: "",
                default_model: "",
                models: CUSTOM_MODELS,
            },
        }
    }

    pub fn default_config(self) -> ProviderConfig {
        let preset = self.preset();
        ProviderConfig::new(preset.base_url, "", preset.default_model)
    }
}

/// Preset for `provider_id`, or the persisted override in its place. The
/// override replaces the whole triple, including blank fields.
pub fn resolve_provider_config(
    provider_id: &str,
    overrides: Option<&ProviderConfig>,
) -> ProviderConfig {
    match overrides {
        Some(stored) => ProviderConfig::new(&stored.base_url, stored.api_key.clone(), stored.model.clone()),
        None => Provider::from_id_or_custom(provider_id).default_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for provider in Provider::ALL {
            assert_eq!(Provider::from_id(provider.id()), Some(provider));
        }
        assert_eq!(Provider::from_id(" OpenAI "), Some(Provider::OpenAi));
    }

    #[test]
    fn preset_is_used_without_override() {
        let config = resolve_provider_config("openai", None);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-image-1");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn override_replaces_the_whole_triple() {
        let stored = ProviderConfig {
            base_url: "https://proxy.example.com/v1/".into(),
            api_key: "sk-stored".into(),
            model: String::new(),
        };
        let config = resolve_provider_config("openai", Some(&stored));
        assert_eq!(config.base_url, "https://proxy.example.com/v1");
        assert_eq!(config.api_key, "sk-stored");
        assert_eq!(config.model, "");
    }

    #[test]
    fn unknown_provider_falls_back_to_custom() {
        assert_eq!(Provider::from_id_or_custom("midjourney"), Provider::Custom);
        let config = resolve_provider_config("midjourney", None);
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(Provider::Custom.preset().models.len(), 1);
    }

    #[test]
    fn preset_default_model_is_selectable() {
        for provider in Provider::ALL {
            let preset = provider.preset();
            assert!(preset.models.iter().any(|model| model.id == preset.default_model));
            assert!(!preset.base_url.ends_with('/'));
        }
    }
}
