//! Translation bundles: one flat key → string table per locale.
//!
//! Assets are JSON documents, either flat (`{"hero.title": "…"}`) or nested
//! (`{"hero": {"title": "…"}}`). Nested objects are flattened into
//! dot-namespaced keys on load, so lookups only ever see flat keys.

use crate::i18n::Locale;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure to produce a bundle for a supported locale.
///
/// All variants are configuration errors and should stop the process at
/// startup rather than surface per request.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("no translation bundle for locale '{0}'")]
    Missing(&'static str),

    #[error("failed to read translation bundle {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse translation bundle for locale '{locale}'")]
    Parse {
        locale: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("translation bundle for locale '{locale}' must be a JSON object")]
    NotAnObject { locale: &'static str },

    #[error("translation bundle for locale '{locale}' has a non-string value at '{key}'")]
    InvalidValue { locale: &'static str, key: String },
}

/// Where bundle assets come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BundleSource {
    /// `messages/*.json` compiled into the binary.
    #[default]
    Embedded,

    /// `<dir>/<code>.json` read from disk.
    Directory(PathBuf),
}

impl BundleSource {
    /// Read the raw asset text for a locale.
    fn read(&self, locale: Locale) -> Result<String, BundleError> {
        match self {
            BundleSource::Embedded => embedded_asset(locale.code())
                .map(str::to_string)
                .ok_or(BundleError::Missing(locale.code())),
            BundleSource::Directory(dir) => read_asset_file(dir, locale),
        }
    }
}

fn embedded_asset(code: &str) -> Option<&'static str> {
    match code {
        "fa" => Some(include_str!("../../messages/fa.json")),
        "en" => Some(include_str!("../../messages/en.json")),
        _ => None,
    }
}

fn read_asset_file(dir: &Path, locale: Locale) -> Result<String, BundleError> {
    let path = dir.join(format!("{}.json", locale.code()));
    debug!("Reading translation bundle from {}", path.display());

    std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            BundleError::Missing(locale.code())
        } else {
            BundleError::Io { path, source }
        }
    })
}

/// Load the embedded bundle for a locale.
pub fn load_bundle(locale: Locale) -> Result<TranslationBundle, BundleError> {
    load_bundle_from(&BundleSource::Embedded, locale)
}

/// Load a locale's bundle from the given source.
pub fn load_bundle_from(
    source: &BundleSource,
    locale: Locale,
) -> Result<TranslationBundle, BundleError> {
    let raw = source.read(locale)?;
    TranslationBundle::from_json_str(locale, &raw)
}

/// All translations for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBundle {
    locale: Locale,
    entries: HashMap<String, String>,
}

impl TranslationBundle {
    /// Parse a JSON asset, flattening nested objects into dot keys.
    pub fn from_json_str(locale: Locale, json: &str) -> Result<Self, BundleError> {
        let value: Value = serde_json::from_str(json).map_err(|source| BundleError::Parse {
            locale: locale.code(),
            source,
        })?;

        let Value::Object(root) = value else {
            return Err(BundleError::NotAnObject {
                locale: locale.code(),
            });
        };

        let mut entries = HashMap::new();
        flatten_into(locale, "", &root, &mut entries)?;

        Ok(Self { locale, entries })
    }

    /// Build a bundle from already-flat pairs.
    pub fn from_entries<I, K, V>(locale: Locale, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            locale,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order, for stable reports.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(
    locale: Locale,
    prefix: &str,
    object: &Map<String, Value>,
    out: &mut HashMap<String, String>,
) -> Result<(), BundleError> {
    for (segment, value) in object {
        let key = if prefix.is_empty() {
            segment.clone()
        } else {
            format!("{}.{}", prefix, segment)
        };

        match value {
            Value::String(text) => {
                out.insert(key, text.clone());
            }
            Value::Object(nested) => flatten_into(locale, &key, nested, out)?,
            _ => {
                return Err(BundleError::InvalidValue {
                    locale: locale.code(),
                    key,
                })
            }
        }
    }
    Ok(())
}
