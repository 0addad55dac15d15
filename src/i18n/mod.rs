//! Internationalization (i18n): locales, translation bundles and lookup.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and their metadata
//! - `locale`: Validated `Locale` type, `Direction`, and locale resolution
//! - `bundle`: Translation assets parsed into flat key → string bundles
//! - `store`: All bundles loaded once, with one-hop fallback lookup
//! - `coverage`: Bundle completeness checks against the default bundle
//! - `metrics`: Lookup hit/fallback/missing counters
//! - `numerals`: Persian/English digit conversion and number formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use taliman_site::i18n::{resolve_locale, TranslationStore};
//!
//! let store = TranslationStore::embedded()?;
//! let locale = resolve_locale("en")?;
//! let title = store.translate(locale, "hero.title");
//! ```

mod bundle;
mod coverage;
mod locale;
mod metrics;
mod numerals;
mod registry;
mod store;

pub use bundle::{load_bundle, load_bundle_from, BundleError, BundleSource, TranslationBundle};
pub use coverage::{CoverageChecker, CoverageReport};
pub use locale::{resolve_locale, resolve_optional_locale, Direction, Locale, LocaleError};
pub use metrics::{LookupMetrics, MetricsReport};
pub use numerals::{convert_numerals, format_number, NumeralSystem};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use store::{interpolate, lookup, lookup_with_outcome, LookupOutcome, TranslationStore};
