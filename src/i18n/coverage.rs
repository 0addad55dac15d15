//! Bundle coverage checks.
//!
//! Compares a translated bundle against the default bundle, which owns the
//! canonical key set. Keys the default lacks are errors; gaps that will fall
//! back, placeholder drift and empty values are warnings.

use crate::i18n::TranslationBundle;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Coverage report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Problems that should fail a build
    pub errors: Vec<String>,

    /// Problems that degrade gracefully through fallback
    pub warnings: Vec<String>,
}

impl CoverageReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for CoverageReport {
    fn default() -> Self {
        Self::new()
    }
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches `{name}` placeholders; group 1 is the name.
pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap())
}

/// Checker for bundle coverage.
pub struct CoverageChecker;

impl CoverageChecker {
    /// Check `other` against `default`.
    ///
    /// Also checks `default` itself for empty values when `other` is the
    /// default bundle.
    pub fn check(default: &TranslationBundle, other: &TranslationBundle) -> CoverageReport {
        let mut report = CoverageReport::new();
        let locale = other.locale();

        for key in other.keys() {
            if !default.contains(key) {
                report.errors.push(format!(
                    "[{}] '{}' is not in the default bundle and can never be looked up",
                    locale, key
                ));
            }
        }

        for key in default.keys() {
            let Some(value) = other.get(key) else {
                report.warnings.push(format!(
                    "[{}] '{}' is missing and falls back to the default locale",
                    locale, key
                ));
                continue;
            };

            if value.trim().is_empty() {
                report
                    .warnings
                    .push(format!("[{}] '{}' has an empty value", locale, key));
            }

            let expected = Self::extract_placeholders(default.get(key).unwrap_or_default());
            let actual = Self::extract_placeholders(value);
            if expected != actual {
                report.warnings.push(format!(
                    "[{}] '{}' placeholder mismatch: default has {:?}, translation has {:?}",
                    locale, key, expected, actual
                ));
            }
        }

        report
    }

    /// Extract placeholder names from a template
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        placeholder_regex()
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
