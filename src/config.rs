//! Configuration loading and validation
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    LoggingConfig,
    MAX_FULL_LOAD_DELAY_MS,
    PortalSettings,
    TranslationFilesConfig,
    ValidationError,
};
