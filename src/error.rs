use thiserror::Error;

/// Errors raised by bundle construction and registry operations.
///
/// Missing keys are never an error: lookups return `None` and the resolver turns a total miss
/// into a placeholder string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The input is not a tree of string leaves and named groups.
    #[error("Malformed bundle for locale '{locale}': {reason}")]
    MalformedBundle { locale: String, reason: String },

    /// No bundle is registered under the requested locale tag.
    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    /// A bundle with the same locale tag is already registered.
    #[error("Locale '{0}' is already registered")]
    DuplicateLocale(String),

    /// The locale is the active or fallback locale and cannot be removed.
    #[error("Locale '{0}' is in use as the active or fallback locale")]
    LocaleInUse(String),
}

impl RegistryError {
    pub(crate) fn malformed(locale: &str, reason: impl Into<String>) -> Self {
        Self::MalformedBundle { locale: locale.to_string(), reason: reason.into() }
    }
}
