//! A workspace root, the settings read from it and the locale files it points at.

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    LocaleFileMatcher,
    MatcherError,
    RegistrySettings,
};
use crate::loader::{
    LoadError,
    load_locale_dir,
};
use crate::registry::Registry;

/// Name of the settings file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".oneterm-i18n.json";

/// Validated settings for one workspace root.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory the settings file and `localeDir` are relative to
    root: PathBuf,
    /// Validated settings
    settings: RegistrySettings,
    /// File the settings were read from; `None` when defaults apply
    config_file: Option<PathBuf>,
}

impl Workspace {
    /// Reads and validates `.oneterm-i18n.json` under `root`. Defaults apply when the file is
    /// absent.
    ///
    /// # Errors
    /// - File read error other than a missing file
    /// - JSON parse error
    /// - Validation error
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE_NAME);

        let (settings, config_file) = match read_settings(&config_path)? {
            Some(settings) => (settings, Some(config_path)),
            None => {
                tracing::debug!(path = %config_path.display(), "No settings file, using defaults");
                (RegistrySettings::default(), None)
            }
        };
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(root = %root.display(), ?settings, "Opened workspace");
        Ok(Self { root, settings, config_file })
    }

    #[must_use]
    pub const fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    #[must_use]
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// `localeDir` joined onto the workspace root.
    #[must_use]
    pub fn locale_dir(&self) -> PathBuf {
        self.root.join(&self.settings.locale_dir)
    }

    /// Matcher for the `localeFiles` patterns under [`Self::locale_dir`].
    pub fn locale_file_matcher(&self) -> Result<LocaleFileMatcher, MatcherError> {
        LocaleFileMatcher::new(self.locale_dir(), &self.settings)
    }

    /// Loads every locale file and builds a registry from them.
    ///
    /// # Errors
    /// Any loader error, or a registry error (missing default or fallback locale, key segments
    /// containing `keySeparator`) wrapped as `LoadError::Bundle`.
    pub fn load_registry(&self) -> Result<Registry, LoadError> {
        let bundles = load_locale_dir(&self.locale_file_matcher()?)?;
        Ok(Registry::from_settings(bundles, &self.settings)?)
    }
}

/// Parses the settings file at `path`, or `None` when it does not exist.
fn read_settings(path: &Path) -> Result<Option<RegistrySettings>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(path = %path.display(), "Loading settings file");
    Ok(Some(serde_json::from_str(&content)?))
}
