use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::is_valid_locale_tag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "localeFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// How a key that no locale provides is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderStyle {
    /// The key itself, e.g. `log.missing`.
    #[default]
    MissingKey,
    /// The key wrapped in brackets, e.g. `[log.missing]`.
    Bracketed,
}

impl PlaceholderStyle {
    /// Renders the placeholder for `key`; never returns an empty string.
    #[must_use]
    pub fn render(self, key: &str) -> String {
        match self {
            Self::MissingKey if !key.is_empty() => key.to_string(),
            Self::MissingKey | Self::Bracketed => format!("[{key}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrySettings {
    /// Directory holding one JSON file per locale, relative to the workspace root.
    pub locale_dir: String,
    pub locale_files: LocaleFilesConfig,

    /// Locale active right after startup.
    pub default_locale: String,
    /// Locale consulted when the requested one lacks a key. `null` disables fallback.
    pub fallback_locale: Option<String>,

    pub key_separator: String,
    pub placeholder: PlaceholderStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocaleFilesConfig {
    /// Glob patterns relative to `localeDir`.
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl RegistrySettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid locale tag
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locale_dir.is_empty() {
            errors.push(ValidationError::new(
                "localeDir",
                "The directory cannot be empty. Example: \"locales\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if !is_valid_locale_tag(&self.default_locale) {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!("Invalid locale tag '{}'. Example: \"zh\" or \"en-US\"", self.default_locale),
            ));
        }

        if let Some(fallback) = &self.fallback_locale
            && !is_valid_locale_tag(fallback)
        {
            errors.push(ValidationError::new(
                "fallbackLocale",
                format!("Invalid locale tag '{fallback}'. Use a tag such as \"en\", or null to disable fallback"),
            ));
        }

        if self.locale_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "localeFiles.includePatterns",
                "At least one pattern is required. Example: [\"*.json\"]",
            ));
        }

        for (index, pattern) in self.locale_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("localeFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.locale_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("localeFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            locale_dir: "locales".to_string(),
            locale_files: LocaleFilesConfig::default(),
            default_locale: "zh".to_string(),
            fallback_locale: Some("en".to_string()),
            key_separator: ".".to_string(),
            placeholder: PlaceholderStyle::default(),
        }
    }
}

impl Default for LocaleFilesConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["*.json".to_string()], exclude_patterns: Vec::new() }
    }
}
