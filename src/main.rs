use anyhow::{Context, Result};
use std::sync::Arc;
use taliman_site::config::Config;
use taliman_site::i18n::TranslationStore;
use taliman_site::server::{self, AppState};
use taliman_site::transport::ContactTransport;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taliman_site=info".parse()?),
        )
        .init();

    info!("Starting Taliman site");

    let config = Config::from_env()?;

    // Bundles are required; refuse to start without them
    let store = TranslationStore::load(&config.bundle_source())
        .context("Failed to load translation bundles")?;

    for (locale, report) in store.coverage() {
        for message in &report.errors {
            error!("{}", message);
        }
        for message in &report.warnings {
            warn!("{}", message);
        }
        if report.is_clean() {
            info!("[{}] bundle fully covers the default locale", locale);
        }
    }

    let transport = ContactTransport::from_config(&config)?;
    match &transport {
        ContactTransport::Webhook { url, .. } => info!("Contact submissions go to {}", url),
        ContactTransport::Log => info!("No contact webhook configured, submissions are logged"),
    }

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    server::serve(
        listener,
        AppState {
            store: Arc::new(store),
            transport,
            admin_api_key: config.admin_api_key,
        },
    )
    .await
}
