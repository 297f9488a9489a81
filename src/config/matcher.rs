//! Locale file pattern matcher.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::RegistrySettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid locale file include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid locale file exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches files under the locale directory against `localeFiles` patterns.
#[derive(Debug, Clone)]
pub struct LocaleFileMatcher {
    /// Directory the patterns are relative to
    locale_dir: PathBuf,
    /// Compiled `localeFiles.includePatterns`
    include_set: GlobSet,
    /// Compiled `localeFiles.excludePatterns`
    exclude_set: GlobSet,
}

impl LocaleFileMatcher {
    /// Creates a new matcher from settings.
    pub fn new(locale_dir: PathBuf, settings: &RegistrySettings) -> Result<Self, MatcherError> {
        let include_set =
            Self::build_glob_set(&settings.locale_files.include_patterns, |pattern, source| {
                MatcherError::InvalidIncludePattern { pattern, source }
            })?;

        let exclude_set =
            Self::build_glob_set(&settings.locale_files.exclude_patterns, |pattern, source| {
                MatcherError::InvalidExcludePattern { pattern, source }
            })?;

        Ok(Self { locale_dir, include_set, exclude_set })
    }

    /// Compiles `patterns`, mapping the first invalid one through `make_error`.
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn locale_dir(&self) -> &Path {
        &self.locale_dir
    }

    /// Returns true if the path is under the locale directory, matches an include pattern and
    /// no exclude pattern.
    #[must_use]
    pub fn is_locale_file(&self, path: &Path) -> bool {
        let Some(relative_path) = path.strip_prefix(&self.locale_dir).ok() else {
            return false;
        };

        self.is_locale_file_relative(relative_path)
    }

    /// Same as [`Self::is_locale_file`] for a path relative to the locale directory.
    #[must_use]
    pub fn is_locale_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}
