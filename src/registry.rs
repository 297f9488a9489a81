//! Registered locales, the active locale and key resolution.
//!
//! # Concurrency
//!
//! The bundle map, the active bundle and the fallback bundle are each published through
//! `arc_swap`. Readers load the current `Arc` without locking and walk a complete bundle; a
//! switch or reload stores a new `Arc`, and lookups already in flight keep the old one.
//! Writers serialize on a mutex that readers never touch.

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use arc_swap::{
    ArcSwap,
    ArcSwapOption,
};

use crate::bundle::LocaleBundle;
use crate::config::{
    PlaceholderStyle,
    RegistrySettings,
};
use crate::coverage::CoverageReport;
use crate::error::RegistryError;
use crate::negotiate::negotiate;
use crate::types::{
    DEFAULT_KEY_SEPARATOR,
    KeyPath,
    LocaleTag,
};

/// Registered bundles by locale tag.
type BundleMap = HashMap<LocaleTag, Arc<LocaleBundle>>;

/// Holds every registered locale bundle and the process' active locale.
///
/// Share it as `Arc<Registry>`; all methods take `&self`.
///
/// # Examples
/// ```
/// use oneterm_i18n::bundle::LocaleBundle;
/// use oneterm_i18n::registry::Registry;
///
/// let zh = LocaleBundle::from_value("zh", &serde_json::json!({"menu": {"oneterm": "堡垒机"}}))?;
/// let registry = Registry::new(zh)?;
///
/// assert_eq!(registry.resolve_active("menu.oneterm"), "堡垒机");
/// assert_eq!(registry.resolve_active("log.missing"), "log.missing");
/// # Ok::<(), oneterm_i18n::error::RegistryError>(())
/// ```
#[derive(Debug)]
pub struct Registry {
    /// Registered bundles, replaced as a whole on every change
    bundles: ArcSwap<BundleMap>,
    /// Snapshot of the active locale's bundle
    active: ArcSwap<LocaleBundle>,
    /// Bundle consulted when the requested locale misses
    fallback: ArcSwapOption<LocaleBundle>,
    /// Serializes writers
    writer: Mutex<()>,
    /// Separator for string keys
    key_separator: Arc<str>,
    /// Rendering of keys no locale provides
    placeholder: PlaceholderStyle,
}

/// Writer guard that ignores poisoning; published values are only ever replaced whole.
fn lock_writer(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Looks `path` up in `primary`, then in `fallback`.
fn lookup<'a>(
    primary: Option<&'a LocaleBundle>,
    fallback: Option<&'a LocaleBundle>,
    path: &KeyPath,
) -> Option<&'a str> {
    primary
        .and_then(|bundle| bundle.get(path))
        .or_else(|| fallback.and_then(|bundle| bundle.get(path)))
}

/// Logs a total miss and renders its placeholder.
fn missing(placeholder: PlaceholderStyle, locale: &str, key: &str) -> String {
    tracing::warn!(locale, key, "Missing translation");
    placeholder.render(key)
}

impl Registry {
    /// Creates a registry with a single bundle, active, and no fallback locale.
    ///
    /// # Errors
    /// `MalformedBundle` when a key segment contains the default key separator.
    pub fn new(initial: LocaleBundle) -> Result<Self, RegistryError> {
        initial.check_key_separator(DEFAULT_KEY_SEPARATOR)?;
        let initial = Arc::new(initial);
        let bundles = HashMap::from([(initial.locale().to_string(), Arc::clone(&initial))]);

        Ok(Self {
            bundles: ArcSwap::from_pointee(bundles),
            active: ArcSwap::new(initial),
            fallback: ArcSwapOption::empty(),
            writer: Mutex::new(()),
            key_separator: Arc::from(DEFAULT_KEY_SEPARATOR),
            placeholder: PlaceholderStyle::default(),
        })
    }

    /// Creates a registry from loaded bundles and settings.
    ///
    /// # Errors
    /// - `MalformedBundle` when a key segment contains `keySeparator`
    /// - `DuplicateLocale` when two bundles share a tag
    /// - `UnknownLocale` when `defaultLocale` or `fallbackLocale` has no bundle
    pub fn from_settings<I>(bundles: I, settings: &RegistrySettings) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = LocaleBundle>,
    {
        let mut registered = BundleMap::new();
        for bundle in bundles {
            bundle.check_key_separator(&settings.key_separator)?;
            let locale = bundle.locale().to_string();
            if registered.contains_key(&locale) {
                return Err(RegistryError::DuplicateLocale(locale));
            }
            registered.insert(locale, Arc::new(bundle));
        }

        let active = registered
            .get(&settings.default_locale)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownLocale(settings.default_locale.clone()))?;
        let fallback = settings
            .fallback_locale
            .as_ref()
            .map(|tag| {
                registered.get(tag).cloned().ok_or_else(|| RegistryError::UnknownLocale(tag.clone()))
            })
            .transpose()?;

        tracing::debug!(
            locales = registered.len(),
            default = %settings.default_locale,
            fallback = ?settings.fallback_locale,
            "Created locale registry"
        );

        Ok(Self {
            bundles: ArcSwap::from_pointee(registered),
            active: ArcSwap::new(active),
            fallback: ArcSwapOption::new(fallback),
            writer: Mutex::new(()),
            key_separator: Arc::from(settings.key_separator.as_str()),
            placeholder: settings.placeholder,
        })
    }

    /// Adds a bundle for a new locale.
    ///
    /// # Errors
    /// - `MalformedBundle` when a key segment contains the key separator
    /// - `DuplicateLocale` when the tag is already registered; use [`Self::reload`] to replace
    pub fn register(&self, bundle: LocaleBundle) -> Result<(), RegistryError> {
        bundle.check_key_separator(&self.key_separator)?;
        let _writer = lock_writer(&self.writer);

        let locale = bundle.locale().to_string();
        let mut bundles = BundleMap::clone(&self.bundles.load_full());
        if bundles.contains_key(&locale) {
            return Err(RegistryError::DuplicateLocale(locale));
        }
        bundles.insert(locale.clone(), Arc::new(bundle));
        self.bundles.store(Arc::new(bundles));

        tracing::debug!(locale = %locale, "Registered locale");
        Ok(())
    }

    /// Replaces a registered locale's bundle wholesale.
    ///
    /// If the locale is active or the fallback, that snapshot is swapped too. Readers holding
    /// the old snapshot keep using it until they finish.
    ///
    /// # Errors
    /// - `MalformedBundle` when a key segment contains the key separator
    /// - `UnknownLocale` when the tag is not registered
    pub fn reload(&self, bundle: LocaleBundle) -> Result<(), RegistryError> {
        bundle.check_key_separator(&self.key_separator)?;
        let _writer = lock_writer(&self.writer);

        let locale = bundle.locale().to_string();
        let mut bundles = BundleMap::clone(&self.bundles.load_full());
        let Some(slot) = bundles.get_mut(&locale) else {
            return Err(RegistryError::UnknownLocale(locale));
        };
        let bundle = Arc::new(bundle);
        *slot = Arc::clone(&bundle);
        self.bundles.store(Arc::new(bundles));

        if self.active.load().locale() == locale {
            self.active.store(Arc::clone(&bundle));
        }
        if self.fallback.load_full().is_some_and(|fallback| fallback.locale() == locale) {
            self.fallback.store(Some(Arc::clone(&bundle)));
        }
        tracing::debug!(locale = %locale, entries = bundle.len(), "Reloaded locale");
        Ok(())
    }

    /// Removes a locale.
    ///
    /// # Errors
    /// - `UnknownLocale` when the tag is not registered
    /// - `LocaleInUse` when it is the active or fallback locale
    pub fn unregister(&self, locale: &str) -> Result<Arc<LocaleBundle>, RegistryError> {
        let _writer = lock_writer(&self.writer);

        let mut bundles = BundleMap::clone(&self.bundles.load_full());
        if !bundles.contains_key(locale) {
            return Err(RegistryError::UnknownLocale(locale.to_string()));
        }
        let in_use = self.active.load().locale() == locale
            || self.fallback_locale().as_deref() == Some(locale);
        if in_use {
            return Err(RegistryError::LocaleInUse(locale.to_string()));
        }
        let removed = bundles
            .remove(locale)
            .ok_or_else(|| RegistryError::UnknownLocale(locale.to_string()))?;
        self.bundles.store(Arc::new(bundles));

        tracing::debug!(locale, "Unregistered locale");
        Ok(removed)
    }

    /// Switches the active locale.
    ///
    /// # Errors
    /// `UnknownLocale` when no bundle is registered for `locale`; the active locale is left
    /// unchanged.
    pub fn set_active_locale(&self, locale: &str) -> Result<(), RegistryError> {
        let _writer = lock_writer(&self.writer);

        let bundle =
            self.bundle(locale).ok_or_else(|| RegistryError::UnknownLocale(locale.to_string()))?;
        self.active.store(bundle);

        tracing::debug!(locale, "Switched active locale");
        Ok(())
    }

    /// Sets or clears the fallback locale.
    ///
    /// # Errors
    /// `UnknownLocale` when `locale` is not registered.
    pub fn set_fallback_locale(&self, locale: Option<&str>) -> Result<(), RegistryError> {
        let _writer = lock_writer(&self.writer);

        let bundle = locale
            .map(|tag| self.bundle(tag).ok_or_else(|| RegistryError::UnknownLocale(tag.to_string())))
            .transpose()?;
        self.fallback.store(bundle);
        Ok(())
    }

    #[must_use]
    pub fn active_locale(&self) -> LocaleTag {
        self.active.load().locale().to_string()
    }

    /// Snapshot of the active bundle.
    #[must_use]
    pub fn active_bundle(&self) -> Arc<LocaleBundle> {
        self.active.load_full()
    }

    #[must_use]
    pub fn fallback_locale(&self) -> Option<LocaleTag> {
        self.fallback.load_full().map(|fallback| fallback.locale().to_string())
    }

    /// Registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<LocaleTag> {
        let mut locales: Vec<LocaleTag> = self.bundles.load().keys().cloned().collect();
        locales.sort();
        locales
    }

    #[must_use]
    pub fn bundle(&self, locale: &str) -> Option<Arc<LocaleBundle>> {
        self.bundles.load().get(locale).cloned()
    }

    #[must_use]
    pub fn key_separator(&self) -> &str {
        &self.key_separator
    }

    /// Localizer bound to `locale` (which may be unregistered; every lookup then goes to the
    /// fallback).
    #[must_use]
    pub fn localizer_for(&self, locale: &str) -> Localizer {
        let primary = self.bundle(locale);
        self.build_localizer(locale.to_string(), primary)
    }

    /// Localizer bound to the current active locale.
    #[must_use]
    pub fn active_localizer(&self) -> Localizer {
        let primary = self.active_bundle();
        self.build_localizer(primary.locale().to_string(), Some(primary))
    }

    /// Localizer for a request: the explicit `lang` value first, then `Accept-Language`,
    /// then the active locale.
    #[must_use]
    pub fn localizer(&self, lang: Option<&str>, accept_language: Option<&str>) -> Localizer {
        let available = self.locales();
        match negotiate(lang, accept_language, &available) {
            Some(locale) => self.localizer_for(locale),
            None => self.active_localizer(),
        }
    }

    /// Assembles a localizer around `primary` with the current fallback snapshot.
    fn build_localizer(&self, locale: LocaleTag, primary: Option<Arc<LocaleBundle>>) -> Localizer {
        let fallback = self.fallback.load_full().filter(|fallback| fallback.locale() != locale);

        Localizer {
            locale,
            primary,
            fallback,
            key_separator: Arc::clone(&self.key_separator),
            placeholder: self.placeholder,
        }
    }

    /// Looks `key` up in `primary`, then in the current fallback bundle.
    fn resolve_in(&self, primary: Option<&LocaleBundle>, key: &str) -> Option<String> {
        let path = KeyPath::parse(key, &self.key_separator);
        let fallback = self.fallback.load();
        lookup(primary, fallback.as_deref(), &path).map(str::to_string)
    }

    /// Resolves `key` in `locale`, then the fallback locale, then renders a placeholder.
    ///
    /// Never fails and never returns an empty string for a missing key.
    #[must_use]
    pub fn resolve(&self, locale: &str, key: &str) -> String {
        self.try_resolve(locale, key).unwrap_or_else(|| missing(self.placeholder, locale, key))
    }

    /// [`Self::resolve`] against the active locale.
    #[must_use]
    pub fn resolve_active(&self, key: &str) -> String {
        let active = self.active.load();
        self.resolve_in(Some(&**active), key)
            .unwrap_or_else(|| missing(self.placeholder, active.locale(), key))
    }

    /// Like [`Self::resolve`] but reports a total miss as `None` instead of a placeholder.
    #[must_use]
    pub fn try_resolve(&self, locale: &str, key: &str) -> Option<String> {
        let bundles = self.bundles.load();
        self.resolve_in(bundles.get(locale).map(Arc::as_ref), key)
    }

    /// Compares the key sets of every registered locale.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let bundles = self.bundles.load();
        CoverageReport::compare(bundles.values().map(Arc::as_ref))
    }
}

/// Resolves keys against one locale snapshot plus an optional fallback.
///
/// Obtained from [`Registry::localizer`] and friends. Later locale switches or reloads do not
/// affect an existing localizer.
#[derive(Debug, Clone)]
pub struct Localizer {
    /// Requested locale tag
    locale: LocaleTag,
    /// Bundle for `locale`, if registered
    primary: Option<Arc<LocaleBundle>>,
    /// Fallback bundle, if configured and different from `primary`
    fallback: Option<Arc<LocaleBundle>>,
    /// Separator for string keys
    key_separator: Arc<str>,
    /// Rendering of total misses
    placeholder: PlaceholderStyle,
}

impl Localizer {
    /// The locale this localizer was built for.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks `path` up in the primary bundle, then the fallback.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&str> {
        lookup(self.primary.as_deref(), self.fallback.as_deref(), path)
    }

    #[must_use]
    pub fn try_localize(&self, key: &str) -> Option<&str> {
        self.get(&KeyPath::parse(key, &self.key_separator))
    }

    /// Text for `key`, or the placeholder when neither bundle has it.
    #[must_use]
    pub fn localize(&self, key: &str) -> String {
        self.try_localize(key)
            .map_or_else(|| missing(self.placeholder, &self.locale, key), str::to_string)
    }

    /// Text for an already split key path.
    #[must_use]
    pub fn localize_path(&self, path: &KeyPath) -> String {
        self.get(path).map_or_else(
            || missing(self.placeholder, &self.locale, &path.join(&self.key_separator)),
            str::to_string,
        )
    }
}
