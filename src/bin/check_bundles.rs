//! Bundle coverage check - loads every translation bundle and reports gaps
//!
//! Usage:
//!   cargo run --bin check-bundles                 # Check the embedded bundles
//!   cargo run --bin check-bundles -- messages     # Check bundles in a directory
//!
//! Optional:
//! - MESSAGES_DIR (used when no directory argument is given)
//!
//! Exits non-zero when a bundle fails to load or has coverage errors.
//! Warnings (keys that fall back, placeholder drift) are printed but pass.

use anyhow::{Context, Result};
use std::path::PathBuf;
use taliman_site::i18n::{BundleSource, Locale, TranslationStore};

fn source_from_args() -> BundleSource {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MESSAGES_DIR").ok())
        .filter(|dir| !dir.trim().is_empty())
        .map(|dir| BundleSource::Directory(PathBuf::from(dir)))
        .unwrap_or_default()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taliman_site=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let source = source_from_args();
    match &source {
        BundleSource::Embedded => println!("Checking embedded bundles"),
        BundleSource::Directory(dir) => println!("Checking bundles in {}", dir.display()),
    }

    let store = TranslationStore::load(&source).context("Failed to load translation bundles")?;

    for locale in Locale::all() {
        println!("  [{}] {} keys", locale, store.bundle(locale).len());
    }

    let mut error_count = 0;
    let mut warning_count = 0;

    for (locale, report) in store.coverage() {
        println!();
        if report.is_clean() {
            println!("[{}] ✓ fully covered", locale);
            continue;
        }
        for message in &report.errors {
            println!("  ERROR   {}", message);
        }
        for message in &report.warnings {
            println!("  WARNING {}", message);
        }
        error_count += report.errors.len();
        warning_count += report.warnings.len();
    }

    println!();
    println!("{} error(s), {} warning(s)", error_count, warning_count);

    if error_count > 0 {
        anyhow::bail!("Bundle coverage check failed with {} error(s)", error_count);
    }
    Ok(())
}
