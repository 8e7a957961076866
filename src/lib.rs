mod cli;
mod commands;
mod constants;
mod errors;
mod fs_utils;
mod models;
mod providers;
mod session;
mod settings;

pub use cli::run;
pub use commands::generate::{generate_for_session, generate_image};
pub use commands::library::{list_images, refresh_images};
pub use commands::providers::{
    ProviderEdit, load_provider_config, provider_catalog, restore_session, switch_provider,
    update_provider_config,
};

pub use constants::{DEFAULT_NAME_PREFIX, IMAGE_EXTENSIONS, LAST_PROVIDER_KEY};
pub use errors::GenerateError;
pub use fs_utils::{collect_directory_images, next_sequence};
pub use models::{GenerateImageRequest, GenerationResult, ImageEntry, ProviderConfig};
pub use providers::{ModelOption, Provider, ProviderPreset, resolve_provider_config};
pub use session::Session;
pub use settings::SettingsStore;
