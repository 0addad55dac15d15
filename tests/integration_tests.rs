//! Integration tests for the Taliman site
//!
//! These tests start the real HTTP server on an ephemeral port and drive it
//! over TCP, with the contact webhook mocked by wiremock.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use taliman_site::{
    i18n::{BundleSource, TranslationStore},
    retry::RetryConfig,
    server::{self, AppState},
    transport::ContactTransport,
};

// ==================== Test Helpers ====================

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn post_contact(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Start the server with the given store and transport on 127.0.0.1:0
async fn spawn_app_with(
    store: TranslationStore,
    transport: ContactTransport,
    admin_api_key: Option<&str>,
) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    let state = AppState {
        store: Arc::new(store),
        transport,
        admin_api_key: admin_api_key.map(str::to_string),
    };
    tokio::spawn(server::serve(listener, state));

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }
}

async fn spawn_app() -> TestApp {
    spawn_app_with(embedded_store(), ContactTransport::Log, None).await
}

fn embedded_store() -> TranslationStore {
    TranslationStore::load(&BundleSource::Embedded).expect("Embedded bundles should load")
}

fn webhook_transport(server: &MockServer) -> ContactTransport {
    ContactTransport::webhook(&format!("{}/contact", server.uri()), None)
        .unwrap()
        .with_retry(RetryConfig::new(2, Duration::from_millis(10)))
}

/// The canonical valid submission
fn valid_submission() -> Value {
    json!({
        "name": "Ali Reza",
        "email": "Ali@Example.com",
        "company": "Kara Steel",
        "phone": "+98 21 12345678",
        "message": "We need a quote for galvanized wire.",
        "language": "en",
        "consent": true
    })
}

// ==================== Operational Route Tests ====================

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_locales_listing() {
    let app = spawn_app().await;

    let body: Value = app.get("/api/locales").await.json().await.unwrap();
    let locales = body.as_array().unwrap();

    assert_eq!(locales.len(), 2);
    assert_eq!(locales[0]["code"], "fa");
    assert_eq!(locales[0]["dir"], "rtl");
    assert_eq!(locales[0]["is_default"], true);
    assert_eq!(locales[1]["code"], "en");
    assert_eq!(locales[1]["dir"], "ltr");
}

// ==================== Page Routing Tests ====================

#[tokio::test]
async fn test_root_is_persian_rtl() {
    let app = spawn_app().await;

    let response = app.get("/").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["locale"], "fa");
    assert_eq!(body["dir"], "rtl");
    assert_eq!(body["lang"], "fa");
    assert_eq!(body["page"], "home");
    assert_eq!(body["switch_to"]["path"], "/en");
    assert_eq!(body["messages"]["notFound.back"], "بازگشت به خانه");
}

#[tokio::test]
async fn test_en_prefix_is_english_ltr() {
    let app = spawn_app().await;

    let body: Value = app.get("/en").await.json().await.unwrap();
    assert_eq!(body["locale"], "en");
    assert_eq!(body["dir"], "ltr");
    assert_eq!(body["page"], "home");
    assert_eq!(body["switch_to"]["path"], "/");
}

#[tokio::test]
async fn test_english_about_page() {
    let app = spawn_app().await;

    let body: Value = app.get("/en/about").await.json().await.unwrap();
    assert_eq!(body["page"], "about");
    assert_eq!(body["title"], "About Taliman");
    assert_eq!(body["alternates"][0]["path"], "/about");
    assert_eq!(body["alternates"][1]["path"], "/en/about");
}

#[tokio::test]
async fn test_unsupported_locale_is_not_found() {
    let app = spawn_app().await;

    let response = app.get("/de/about").await;
    assert_eq!(response.status(), 404);

    // Rendered in the default locale
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["locale"], "fa");
    assert_eq!(body["title"], "صفحه پیدا نشد");
    assert_eq!(body["back"]["path"], "/");
}

#[tokio::test]
async fn test_unknown_english_page_is_localized_not_found() {
    let app = spawn_app().await;

    let response = app.get("/en/pricing").await;
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["locale"], "en");
    assert_eq!(body["dir"], "ltr");
    assert_eq!(body["title"], "Page not found");
    assert_eq!(body["back"]["path"], "/en");
}

#[tokio::test]
async fn test_directory_bundles_fall_back_per_key() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("fa.json"),
        r#"{"site": {"title": "تالیمان"}, "about": {"title": "درباره ما"}}"#,
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("en.json"),
        r#"{"site": {"title": "Taliman"}}"#,
    )
    .unwrap();

    let store = TranslationStore::load(&BundleSource::Directory(temp_dir.path().to_path_buf()))
        .expect("Directory bundles should load");
    let app = spawn_app_with(store, ContactTransport::Log, None).await;

    let body: Value = app.get("/en/about").await.json().await.unwrap();
    assert_eq!(body["title"], "درباره ما");
    assert_eq!(body["messages"]["site.title"], "Taliman");
}

// ==================== Contact Form Tests ====================

#[tokio::test]
async fn test_contact_success_is_delivered() {
    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contact"))
        .and(body_partial_json(json!({
            "name": "Ali Reza",
            "email": "ali@example.com",
            "language": "en",
            "consent": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&webhook)
        .await;

    let app = spawn_app_with(embedded_store(), webhook_transport(&webhook), None).await;

    let response = app.post_contact(valid_submission()).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Thank you, Ali Reza."));
}

#[tokio::test]
async fn test_contact_field_errors_are_localized() {
    let app = spawn_app().await;

    let response = app
        .post_contact(json!({
            "name": "A",
            "email": "not-an-email",
            "message": "short",
            "language": "en",
            "consent": false
        }))
        .await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["errors"]["name"],
        "Name must be at least 2 characters"
    );
    assert_eq!(
        body["errors"]["email"],
        "Please enter a valid email address"
    );
    assert_eq!(
        body["errors"]["consent"],
        "You must agree to the privacy policy"
    );
    assert!(body["errors"]["message"].is_string());
}

#[tokio::test]
async fn test_contact_errors_use_default_locale_for_bad_language() {
    let app = spawn_app().await;

    let mut submission = valid_submission();
    submission["language"] = json!("de");

    let response = app.post_contact(submission).await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.unwrap();
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("language"));
}

#[tokio::test]
async fn test_contact_honeypot_is_silently_dropped() {
    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&webhook)
        .await;

    let app = spawn_app_with(embedded_store(), webhook_transport(&webhook), None).await;

    let mut submission = valid_submission();
    submission["website"] = json!("http://spam.example.com");

    let response = app.post_contact(submission).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_contact_transport_failure_is_bad_gateway() {
    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&webhook)
        .await;

    let app = spawn_app_with(embedded_store(), webhook_transport(&webhook), None).await;

    let response = app.post_contact(valid_submission()).await;
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Your message could not be sent. Please try again."
    );
}

#[tokio::test]
async fn test_contact_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(format!("{}/api/contact", app.base_url))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

// ==================== Metrics Auth Tests ====================

#[tokio::test]
async fn test_metrics_hidden_without_configured_key() {
    let app = spawn_app().await;

    let response = app.get("/api/metrics").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_metrics_requires_matching_key() {
    let app = spawn_app_with(embedded_store(), ContactTransport::Log, Some("admin-key")).await;

    let response = app.get("/api/metrics").await;
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .get(format!("{}/api/metrics", app.base_url))
        .header("X-API-Key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_metrics_count_page_lookups() {
    let app = spawn_app_with(embedded_store(), ContactTransport::Log, Some("admin-key")).await;

    app.get("/en/about").await;

    let response = app
        .client
        .get(format!("{}/api/metrics", app.base_url))
        .header("X-API-Key", "admin-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(body["lookups"]["lookups"].as_u64().unwrap() >= 1);
    assert_eq!(body["coverage"]["en"]["errors"], 0);
}
