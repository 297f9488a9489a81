//! Shared helpers for unit tests.
#![cfg(test)]
#![allow(clippy::expect_used)]

use serde_json::Value;

use crate::bundle::LocaleBundle;
use crate::config::RegistrySettings;
use crate::registry::Registry;

/// Shipped Chinese locale data.
const ZH_JSON: &str = include_str!("../locales/zh.json");
/// Shipped English locale data.
const EN_JSON: &str = include_str!("../locales/en.json");

/// Parses shipped locale text into a bundle.
fn shipped_bundle(locale: &str, text: &str) -> LocaleBundle {
    let value: Value = serde_json::from_str(text).expect("shipped locale is valid JSON");
    LocaleBundle::from_value(locale, &value).expect("shipped locale is a valid bundle")
}

/// The `zh` bundle from `locales/zh.json`.
pub(crate) fn zh_bundle() -> LocaleBundle {
    shipped_bundle("zh", ZH_JSON)
}

/// The `en` bundle from `locales/en.json`.
pub(crate) fn en_bundle() -> LocaleBundle {
    shipped_bundle("en", EN_JSON)
}

/// Registry with both shipped locales and default settings (`zh` active, `en` fallback).
pub(crate) fn shipped_registry() -> Registry {
    Registry::from_settings([zh_bundle(), en_bundle()], &RegistrySettings::default())
        .expect("shipped locales satisfy the default settings")
}
