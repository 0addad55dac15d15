//! Locale registry: Single source of truth for all supported locales.
//!
//! The registry is a process-wide singleton built once with `OnceLock` and
//! never mutated afterwards. Routing, bundle loading and the contact form all
//! consult it instead of carrying their own copy of the locale list.

use crate::i18n::Direction;
use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 code, also used as the URL prefix (e.g., "fa", "en")
    pub code: &'static str,

    /// English name of the locale (e.g., "Persian", "English")
    pub name: &'static str,

    /// Name shown in the language switcher (e.g., "فارسی", "English")
    pub native_name: &'static str,

    /// Open Graph locale tag (e.g., "fa_IR")
    pub og_locale: &'static str,

    /// CSS font stack hint for the rendering layer
    pub font_family: &'static str,

    /// Whether this is the default/fallback locale (exactly one must be true)
    pub is_default: bool,
}

impl LocaleConfig {
    /// Text direction, derived from the code and never stored separately.
    pub fn direction(&self) -> Direction {
        Direction::for_code(self.code)
    }
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its exact code.
    ///
    /// Matching is case-sensitive: `"FA"` is not a supported code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All supported locales, default first.
    pub fn list(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Supported locale codes, default first.
    pub fn codes(&self) -> Vec<&'static str> {
        self.locales.iter().map(|locale| locale.code).collect()
    }

    /// Get the default locale configuration.
    ///
    /// # Panics
    /// Panics if the built-in table does not define exactly one default
    /// locale. The table is compiled in, so this is a programming error.
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }

    /// Check if a locale code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// Built-in locale table: Persian (default) and English.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "fa",
            name: "Persian",
            native_name: "فارسی",
            og_locale: "fa_IR",
            font_family: "Vazirmatn, Tahoma, Arial, sans-serif",
            is_default: true,
        },
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            og_locale: "en_US",
            font_family: "Inter, system-ui, sans-serif",
            is_default: false,
        },
    ]
}
