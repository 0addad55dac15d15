use crate::i18n::BundleSource;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Translations (embedded assets when unset)
    pub messages_dir: Option<PathBuf>,

    // Contact delivery (submissions are logged when unset)
    pub contact_webhook_url: Option<String>,
    pub contact_webhook_token: Option<String>,

    // Admin endpoints are disabled when unset
    pub admin_api_key: Option<String>,
}

/// Read an optional variable, treating an empty value as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: match optional_var("PORT") {
                Some(port) => port
                    .parse()
                    .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?,
                None => 8080,
            },

            messages_dir: optional_var("MESSAGES_DIR").map(PathBuf::from),

            contact_webhook_url: optional_var("CONTACT_WEBHOOK_URL"),
            contact_webhook_token: optional_var("CONTACT_WEBHOOK_TOKEN"),

            admin_api_key: optional_var("ADMIN_API_KEY"),
        })
    }

    /// Where translation bundles are loaded from.
    pub fn bundle_source(&self) -> BundleSource {
        match &self.messages_dir {
            Some(dir) => BundleSource::Directory(dir.clone()),
            None => BundleSource::Embedded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "PORT",
        "MESSAGES_DIR",
        "CONTACT_WEBHOOK_URL",
        "CONTACT_WEBHOOK_TOKEN",
        "ADMIN_API_KEY",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.messages_dir.is_none());
        assert!(config.contact_webhook_url.is_none());
        assert!(config.admin_api_key.is_none());
        assert_eq!(config.bundle_source(), BundleSource::Embedded);
    }

    #[test]
    #[serial]
    fn test_reads_all_variables() {
        clear_env();
        std::env::set_var("PORT", "3000");
        std::env::set_var("MESSAGES_DIR", "/srv/messages");
        std::env::set_var("CONTACT_WEBHOOK_URL", "https://hooks.example.com/contact");
        std::env::set_var("CONTACT_WEBHOOK_TOKEN", "token");
        std::env::set_var("ADMIN_API_KEY", "admin");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.port, 3000);
        assert_eq!(
            config.bundle_source(),
            BundleSource::Directory(PathBuf::from("/srv/messages"))
        );
        assert_eq!(
            config.contact_webhook_url.as_deref(),
            Some("https://hooks.example.com/contact")
        );
        assert_eq!(config.contact_webhook_token.as_deref(), Some("token"));
        assert_eq!(config.admin_api_key.as_deref(), Some("admin"));
    }

    #[test]
    #[serial]
    fn test_empty_values_are_unset() {
        clear_env();
        std::env::set_var("ADMIN_API_KEY", "  ");
        std::env::set_var("CONTACT_WEBHOOK_URL", "");

        let config = Config::from_env().unwrap();
        clear_env();

        assert!(config.admin_api_key.is_none());
        assert!(config.contact_webhook_url.is_none());
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_error() {
        clear_env();
        std::env::set_var("PORT", "eighty");

        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("PORT must be a valid port number"));
    }
}
