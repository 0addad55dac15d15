//! Translation store: every supported locale's bundle, loaded once.
//!
//! Lookups fall back exactly one hop, to the default locale's bundle. A key
//! missing from both renders as the key itself and is logged, so a broken
//! translation shows up on the page instead of taking the page down.

use crate::i18n::coverage::{placeholder_regex, CoverageChecker, CoverageReport};
use crate::i18n::{BundleError, BundleSource, Locale, LookupMetrics, TranslationBundle};
use regex::Captures;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Where a lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Fallback,
    Missing,
}

/// Look a key up in `bundle`, then in `default_bundle`, then give back the key.
pub fn lookup<'a>(
    bundle: &'a TranslationBundle,
    default_bundle: &'a TranslationBundle,
    key: &'a str,
) -> &'a str {
    lookup_with_outcome(bundle, default_bundle, key).0
}

/// Same as [`lookup`], also reporting which step answered.
pub fn lookup_with_outcome<'a>(
    bundle: &'a TranslationBundle,
    default_bundle: &'a TranslationBundle,
    key: &'a str,
) -> (&'a str, LookupOutcome) {
    if let Some(value) = bundle.get(key) {
        return (value, LookupOutcome::Hit);
    }
    if let Some(value) = default_bundle.get(key) {
        return (value, LookupOutcome::Fallback);
    }
    (key, LookupOutcome::Missing)
}

/// Replace `{name}` placeholders with values from `params`.
///
/// Placeholders without a matching parameter are left as written.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

static EMBEDDED: OnceLock<TranslationStore> = OnceLock::new();

/// Bundles for every supported locale plus lookup metrics.
///
/// Immutable after construction; share it behind an `Arc` or use the
/// process-wide [`TranslationStore::embedded`] instance.
#[derive(Debug)]
pub struct TranslationStore {
    bundles: HashMap<Locale, TranslationBundle>,
    default_locale: Locale,
    metrics: LookupMetrics,
}

impl TranslationStore {
    /// Load every supported locale from `source`.
    ///
    /// Fails on the first locale whose bundle is missing or malformed.
    pub fn load(source: &BundleSource) -> Result<Self, BundleError> {
        let bundles = Locale::all()
            .into_iter()
            .map(|locale| crate::i18n::load_bundle_from(source, locale))
            .collect::<Result<Vec<_>, _>>()?;

        let store = Self::from_bundles(bundles)?;
        info!(
            "Loaded translation bundles: {}",
            Locale::all()
                .iter()
                .map(|l| format!("{}={} keys", l, store.bundle(*l).len()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(store)
    }

    /// Assemble a store from already-parsed bundles.
    ///
    /// Every supported locale must be present.
    pub fn from_bundles<I>(bundles: I) -> Result<Self, BundleError>
    where
        I: IntoIterator<Item = TranslationBundle>,
    {
        let bundles: HashMap<Locale, TranslationBundle> = bundles
            .into_iter()
            .map(|bundle| (bundle.locale(), bundle))
            .collect();

        if let Some(missing) = Locale::all().into_iter().find(|l| !bundles.contains_key(l)) {
            return Err(BundleError::Missing(missing.code()));
        }

        Ok(Self {
            bundles,
            default_locale: Locale::default_locale(),
            metrics: LookupMetrics::new(),
        })
    }

    /// Process-wide store built from the embedded assets on first use.
    pub fn embedded() -> Result<&'static TranslationStore, BundleError> {
        if let Some(store) = EMBEDDED.get() {
            return Ok(store);
        }
        let store = Self::load(&BundleSource::Embedded)?;
        Ok(EMBEDDED.get_or_init(|| store))
    }

    /// Bundle for a supported locale.
    pub fn bundle(&self, locale: Locale) -> &TranslationBundle {
        self.bundles
            .get(&locale)
            .expect("every supported locale has a bundle")
    }

    pub fn default_bundle(&self) -> &TranslationBundle {
        self.bundle(self.default_locale)
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Translate `key` for `locale`, falling back to the default locale and
    /// then to the key itself.
    pub fn translate<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        let (value, outcome) =
            lookup_with_outcome(self.bundle(locale), self.default_bundle(), key);

        match outcome {
            LookupOutcome::Hit => self.metrics.record_hit(),
            LookupOutcome::Fallback => self.metrics.record_fallback(),
            LookupOutcome::Missing => {
                self.metrics.record_missing();
                warn!(locale = %locale, key = key, "Missing translation key");
            }
        }
        value
    }

    /// Translate and fill `{name}` placeholders.
    pub fn translate_with(&self, locale: Locale, key: &str, params: &[(&str, &str)]) -> String {
        interpolate(self.translate(locale, key), params)
    }

    /// Every default key resolved for `locale`, sorted by key.
    ///
    /// The active bundle's values win; gaps are filled from the default
    /// bundle. Keys only the active bundle has are left out, since the
    /// default bundle defines the canonical key set.
    pub fn resolved_messages(&self, locale: Locale) -> BTreeMap<String, String> {
        let bundle = self.bundle(locale);
        self.default_bundle()
            .iter()
            .map(|(key, default_value)| {
                let value = bundle.get(key).unwrap_or(default_value);
                (key.to_string(), value.to_string())
            })
            .collect()
    }

    /// Coverage of each non-default bundle against the default bundle.
    pub fn coverage(&self) -> Vec<(Locale, CoverageReport)> {
        Locale::all()
            .into_iter()
            .filter(|locale| *locale != self.default_locale)
            .map(|locale| {
                let report = CoverageChecker::check(self.default_bundle(), self.bundle(locale));
                (locale, report)
            })
            .collect()
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }
}
