//! Path-based locale routing.
//!
//! URLs carry the locale as an optional first segment: `/en/about` is English,
//! `/about` is the default locale. Any first segment of exactly two lowercase
//! ASCII letters is treated as a locale prefix, so `/de/about` is not-found
//! rather than a Persian page called "de/about".

use crate::i18n::{resolve_locale, Locale, LocaleError};
use serde::Serialize;
use thiserror::Error;

/// Pages the site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    About,
    Contact,
}

impl Page {
    pub fn all() -> [Page; 3] {
        [Page::Home, Page::About, Page::Contact]
    }

    /// Page for a path remainder (without locale prefix or slashes).
    pub fn from_slug(slug: &str) -> Option<Page> {
        match slug {
            "" => Some(Page::Home),
            "about" => Some(Page::About),
            "contact" => Some(Page::Contact),
            _ => None,
        }
    }

    /// Unprefixed path of the page.
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::About => "/about",
            Page::Contact => "/contact",
        }
    }

    /// Translation key for the page title.
    pub fn title_key(&self) -> &'static str {
        match self {
            Page::Home => "site.title",
            Page::About => "about.title",
            Page::Contact => "contact.title",
        }
    }
}

/// Routing failure; both variants render as not-found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error("no page at '{path}'")]
    UnknownPage { locale: Locale, path: String },
}

impl RouteError {
    /// Locale the not-found response should be rendered in.
    pub fn render_locale(&self) -> Locale {
        match self {
            RouteError::Locale(_) => Locale::default_locale(),
            RouteError::UnknownPage { locale, .. } => *locale,
        }
    }
}

/// A successfully routed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub locale: Locale,
    pub page: Page,
}

fn is_locale_like(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_lowercase())
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Resolve a request path to a locale and page.
pub fn resolve_path(path: &str) -> Result<Route, RouteError> {
    let segments = segments(path);

    let (locale, rest) = match segments.split_first() {
        Some((first, rest)) if is_locale_like(first) => (resolve_locale(first)?, rest),
        _ => (Locale::default_locale(), &segments[..]),
    };

    let slug = rest.join("/");
    let page = Page::from_slug(&slug).ok_or_else(|| RouteError::UnknownPage {
        locale,
        path: path.to_string(),
    })?;

    Ok(Route { locale, page })
}

/// Remove a leading locale-like segment, keeping at least `/`.
pub fn strip_locale_prefix(path: &str) -> String {
    let segments = segments(path);
    let rest = match segments.split_first() {
        Some((first, rest)) if is_locale_like(first) => rest,
        _ => &segments[..],
    };
    format!("/{}", rest.join("/"))
}

/// Build the public path of an unprefixed `path` for `locale`.
///
/// The default locale is served without a prefix; other locales get
/// `/{code}` in front (`/` becomes `/en`, not `/en/`).
pub fn localized_path(path: &str, locale: Locale) -> String {
    let normalized = format!("/{}", segments(path).join("/"));

    if locale.is_default() {
        normalized
    } else if normalized == "/" {
        format!("/{}", locale.code())
    } else {
        format!("/{}{}", locale.code(), normalized)
    }
}

/// Path of the same page in another locale, for the language switcher.
pub fn switch_locale_path(current_path: &str, target: Locale) -> String {
    localized_path(&strip_locale_prefix(current_path), target)
}

/// Every locale's path for a page, default first.
pub fn alternate_paths(page: Page) -> Vec<(Locale, String)> {
    Locale::all()
        .into_iter()
        .map(|locale| (locale, localized_path(page.path(), locale)))
        .collect()
}
