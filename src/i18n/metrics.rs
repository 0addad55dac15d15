//! Lookup metrics for the translation store.
//!
//! Counts how often lookups are served by the active bundle, fall back to the
//! default bundle, or miss entirely. Missing keys are the signal content
//! maintainers act on.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by a `TranslationStore`.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Key found in the requested locale's bundle
    hits: AtomicUsize,

    /// Key served from the default bundle instead
    fallbacks: AtomicUsize,

    /// Key absent from both bundles; the raw key was rendered
    missing: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing(&self) {
        self.missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn missing(&self) -> usize {
        self.missing.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let missing = self.missing();
        let total = hits + fallbacks + missing;

        let percent = |count: usize| {
            if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            }
        };

        MetricsReport {
            lookups: total,
            hits,
            fallbacks,
            missing,
            hit_rate: percent(hits),
            fallback_rate: percent(fallbacks),
        }
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total lookups recorded
    pub lookups: usize,

    pub hits: usize,

    pub fallbacks: usize,

    pub missing: usize,

    /// Direct hit rate as a percentage (0-100)
    pub hit_rate: f64,

    /// Fallback rate as a percentage (0-100)
    pub fallback_rate: f64,
}
