//! Key set comparison across locales.
//!
//! Every registered locale should expose the same key paths. The report lists, per locale,
//! which paths from the union of all locales it lacks.

use std::collections::{
    BTreeSet,
    HashSet,
};

use crate::bundle::LocaleBundle;
use crate::types::KeyPath;

/// Coverage of a set of locales relative to the union of their keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Number of distinct key paths across all locales.
    pub total_keys: usize,
    /// Per-locale results, ordered by locale tag.
    pub locales: Vec<LocaleCoverage>,
}

/// Coverage of a single locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCoverage {
    /// Locale tag
    pub locale: String,
    /// Number of union keys this locale provides.
    pub present: usize,
    /// Union keys this locale lacks, sorted.
    pub missing: Vec<KeyPath>,
}

impl CoverageReport {
    /// Compares the key sets of `bundles`.
    #[must_use]
    pub fn compare<'a, I>(bundles: I) -> Self
    where
        I: IntoIterator<Item = &'a LocaleBundle>,
    {
        let mut bundles: Vec<&LocaleBundle> = bundles.into_iter().collect();
        bundles.sort_by(|a, b| a.locale().cmp(b.locale()));

        let key_sets: Vec<HashSet<KeyPath>> =
            bundles.iter().map(|bundle| bundle.keys().collect()).collect();
        let all_keys: BTreeSet<&KeyPath> = key_sets.iter().flatten().collect();
        let total_keys = all_keys.len();

        let locales = bundles
            .iter()
            .zip(&key_sets)
            .map(|(bundle, keys)| {
                let missing: Vec<KeyPath> =
                    all_keys.iter().filter(|k| !keys.contains(**k)).map(|k| (*k).clone()).collect();
                LocaleCoverage {
                    locale: bundle.locale().to_string(),
                    present: total_keys - missing.len(),
                    missing,
                }
            })
            .collect();

        Self { total_keys, locales }
    }

    /// True when every locale provides every key.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.locales.iter().all(|l| l.missing.is_empty())
    }
}
