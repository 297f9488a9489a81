//! Locale file loading.
//!
//! One JSON file holds one locale; its file stem is the locale tag (`locales/zh.json` → `zh`).

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;
use serde::de::DeserializeSeed;
use serde_json::error::Category;
use thiserror::Error;

use crate::bundle::{
    LocaleBundle,
    NodeSeed,
};
use crate::config::{
    LocaleFileMatcher,
    MatcherError,
};
use crate::error::RegistryError;
use crate::types::{
    KeyPath,
    is_valid_locale_tag,
};

#[derive(Error, Debug)]
pub enum LoadError {
    /// Error when failing to read a locale file
    #[error("Failed to read locale file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON
    #[error("Failed to parse JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The file stem is not usable as a locale tag
    #[error("Cannot derive a locale tag from {0:?}")]
    InvalidLocaleTag(PathBuf),
    /// Two files map to the same locale tag
    #[error("Locale '{locale}' is defined by both {first:?} and {second:?}")]
    DuplicateLocale { locale: String, first: PathBuf, second: PathBuf },
    /// The JSON parsed but is not a translation tree
    #[error(transparent)]
    Bundle(#[from] RegistryError),
    /// Invalid locale file patterns
    #[error(transparent)]
    Pattern(#[from] MatcherError),
    /// Error while walking the locale directory
    #[error("Failed to walk locale directory: {0}")]
    Walk(#[from] ignore::Error),
}

/// Derives the locale tag from a file path: the file stem, if it looks like a tag.
#[must_use]
pub fn detect_locale_from_path(file_path: &Path) -> Option<String> {
    let stem = file_path.file_stem()?.to_str()?;
    is_valid_locale_tag(stem).then(|| stem.to_string())
}

/// Parses JSON text into a bundle for `locale`.
///
/// Duplicate keys, empty segments and non-string leaves are reported as `MalformedBundle`
/// with the offending key path; JSON syntax errors as `Parse`.
pub fn parse_bundle(locale: &str, text: &str, origin: &Path) -> Result<LocaleBundle, LoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let root = NodeSeed { path: KeyPath::default() }
        .deserialize(&mut deserializer)
        .and_then(|root| deserializer.end().map(|()| root))
        .map_err(|e| match e.classify() {
            Category::Data => LoadError::Bundle(RegistryError::malformed(locale, e.to_string())),
            Category::Io | Category::Syntax | Category::Eof => {
                LoadError::Parse { path: origin.to_path_buf(), source: e }
            }
        })?;
    Ok(LocaleBundle::load(locale, root)?)
}

/// Reads one locale file.
pub fn load_bundle_file(file_path: &Path) -> Result<LocaleBundle, LoadError> {
    let locale = detect_locale_from_path(file_path)
        .ok_or_else(|| LoadError::InvalidLocaleTag(file_path.to_path_buf()))?;
    let content = std::fs::read_to_string(file_path)
        .map_err(|source| LoadError::Io { path: file_path.to_path_buf(), source })?;

    parse_bundle(&locale, &content, file_path)
}

/// Lists locale files under the matcher's directory, sorted by path.
pub fn find_locale_files(matcher: &LocaleFileMatcher) -> Result<Vec<PathBuf>, LoadError> {
    let mut found_files = Vec::new();

    for result in WalkBuilder::new(matcher.locale_dir())
        .hidden(true)
        .git_ignore(false)
        .follow_links(false)
        .build()
    {
        let entry = result?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if matcher.is_locale_file(entry.path()) {
            found_files.push(entry.path().to_path_buf());
        }
    }

    found_files.sort();
    Ok(found_files)
}

/// Loads every locale file under the matcher's directory.
///
/// Fails on the first unreadable or malformed file, or when two files share a locale tag.
pub fn load_locale_dir(matcher: &LocaleFileMatcher) -> Result<Vec<LocaleBundle>, LoadError> {
    tracing::debug!(locale_dir = %matcher.locale_dir().display(), "Loading locale files");

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut bundles = Vec::new();
    for file_path in find_locale_files(matcher)? {
        let bundle = load_bundle_file(&file_path)?;
        if let Some(first) = seen.insert(bundle.locale().to_string(), file_path.clone()) {
            return Err(LoadError::DuplicateLocale {
                locale: bundle.locale().to_string(),
                first,
                second: file_path,
            });
        }
        bundles.push(bundle);
    }
    Ok(bundles)
}
