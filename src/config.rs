//! Registry settings: file format, loading and validation.

/// Locale file pattern matcher
mod matcher;
/// Settings types and validation
mod types;
/// Settings file lookup and registry loading for a workspace root
mod workspace;

pub use matcher::{
    LocaleFileMatcher,
    MatcherError,
};
pub use types::{
    ConfigError,
    LocaleFilesConfig,
    PlaceholderStyle,
    RegistrySettings,
    ValidationError,
};
pub use workspace::{
    CONFIG_FILE_NAME,
    Workspace,
};
