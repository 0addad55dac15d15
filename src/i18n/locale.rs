//! Locale type and resolution.
//!
//! A `Locale` can only be constructed from a code the registry knows, so
//! holding one is proof the code is supported. Direction hangs off the code
//! and cannot be set independently.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Text direction for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    /// Direction for a locale code: `fa` is right-to-left, everything else is
    /// left-to-right.
    pub fn for_code(code: &str) -> Direction {
        match code {
            "fa" => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }

    /// Value for the HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr => "ltr",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Direction::Rtl)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locale resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// The candidate is not in the supported set. Callers render not-found.
    #[error("unsupported locale '{0}'")]
    Invalid(String),
}

/// A validated, supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const PERSIAN: Locale = Locale { code: "fa" };

    pub const ENGLISH: Locale = Locale { code: "en" };

    /// Create a Locale from an exact code.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is in the registry
    /// * `Err(LocaleError::Invalid)` otherwise (no fallback to the default)
    pub fn from_code(code: &str) -> Result<Locale, LocaleError> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| Locale { code: config.code })
            .ok_or_else(|| LocaleError::Invalid(code.to_string()))
    }

    /// The default/fallback locale.
    pub fn default_locale() -> Locale {
        Locale {
            code: LocaleRegistry::get().default_locale().code,
        }
    }

    /// Every supported locale, default first.
    pub fn all() -> Vec<Locale> {
        LocaleRegistry::get()
            .codes()
            .into_iter()
            .map(|code| Locale { code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn direction(&self) -> Direction {
        Direction::for_code(self.code)
    }

    /// Full configuration from the registry.
    ///
    /// # Panics
    /// Never in practice: a `Locale` is only built from registry codes.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be registered")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::default_locale()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

/// Resolve a locale code taken from a path segment or request parameter.
///
/// Unknown codes are rejected; they never fall back to the default.
pub fn resolve_locale(candidate: &str) -> Result<Locale, LocaleError> {
    Locale::from_code(candidate)
}

/// Resolve an optional locale: absent or empty means the default locale,
/// anything else must be a supported code.
pub fn resolve_optional_locale(candidate: Option<&str>) -> Result<Locale, LocaleError> {
    match candidate {
        None | Some("") => Ok(Locale::default_locale()),
        Some(code) => resolve_locale(code),
    }
}
