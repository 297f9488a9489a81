//! Core types used throughout the project.

use std::fmt;

use unic_langid::LanguageIdentifier;

/// Separator used when a key path is written as a single string (`menu.oneterm`).
pub const DEFAULT_KEY_SEPARATOR: &str = ".";

/// Opaque locale identifier (e.g. `zh`, `en`, `zh-CN`).
pub type LocaleTag = String;

/// Ordered sequence of segment names locating one translation leaf.
///
/// # Examples
/// ```
/// use oneterm_i18n::types::KeyPath;
///
/// let path = KeyPath::parse("assetList.gatewayTip", ".");
/// assert_eq!(path.segments(), ["assetList", "gatewayTip"]);
/// assert_eq!(path.to_string(), "assetList.gatewayTip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyPath {
    /// Segment names, outermost group first.
    segments: Vec<String>,
}

impl KeyPath {
    /// Builds a path from already split segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// Splits `text` on `separator`.
    ///
    /// An empty `text` yields an empty path, which never resolves.
    #[must_use]
    pub fn parse(text: &str, separator: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        if separator.is_empty() {
            return Self::new([text]);
        }
        Self::new(text.split(separator))
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.to_string());
        Self { segments }
    }

    /// Renders the path with a custom separator.
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_KEY_SEPARATOR))
    }
}

impl From<&str> for KeyPath {
    fn from(text: &str) -> Self {
        Self::parse(text, DEFAULT_KEY_SEPARATOR)
    }
}

/// Parses a locale tag (`zh`, `en-US`, `zh_Hant_TW`) into a language identifier.
///
/// `-` and `_` are both accepted as subtag separators; casing is canonicalized.
#[must_use]
pub fn parse_locale_tag(tag: &str) -> Option<LanguageIdentifier> {
    if tag.is_empty() {
        return None;
    }
    tag.parse().ok()
}

/// True when `tag` parses as a language identifier.
#[must_use]
pub fn is_valid_locale_tag(tag: &str) -> bool {
    parse_locale_tag(tag).is_some()
}
