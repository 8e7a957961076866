pub const DEFAULT_NAME_PREFIX: &str = "generated";
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];
pub const SETTINGS_DIR_NAME: &str = "prompt-gallery";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const LAST_PROVIDER_KEY: &str = "lastProvider";
pub const LOG_FILTER_ENV: &str = "PROMPT_GALLERY_LOG";
