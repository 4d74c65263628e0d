#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use contact_relay::config::{
    Config, SheetsConfig, SmtpConfig, TlsMode, ValidationMode, DEFAULT_RANGE,
};
use contact_relay::email::{templates, Notifier};
use contact_relay::models::Submission;
use contact_relay::sheets::RecordStore;

/// Record store fake that remembers every row it was asked to append.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<Vec<String>>>,
    pub fail: bool,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn append_row(&self, row: &[String]) -> Result<(), String> {
        self.rows.lock().unwrap().push(row.to_vec());
        if self.fail {
            return Err("quota exceeded for service account sa@project.iam".to_string());
        }
        Ok(())
    }
}

/// Notifier fake that keeps the rendered body of every notification.
#[derive(Default)]
pub struct FakeNotifier {
    pub bodies: Mutex<Vec<String>>,
    pub fail: bool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, submission: &Submission) -> Result<(), String> {
        self.bodies
            .lock()
            .unwrap()
            .push(templates::render_notification(submission));
        if self.fail {
            return Err("535 authentication failed".to_string());
        }
        Ok(())
    }
}

/// A running test server instance wired to fake collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<FakeStore>,
    pub notifier: Arc<FakeNotifier>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON to the contact endpoint, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a raw body with the given content type, return (body, status).
    pub async fn submit_raw(&self, content_type: &str, body: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 16 * 1024,
        validation: ValidationMode::Lenient,
        honeypot_field: None,
        rate_limit: 100,
        rate_limit_window_secs: 60,
        trusted_proxies: vec![],
        cors_origins: vec![],
        log_level: "warn".to_string(),
        sheets: SheetsConfig {
            client_email: "contact@test-project.iam.gserviceaccount.com".to_string(),
            private_key: "unused".to_string(),
            spreadsheet_id: "sheet-123".to_string(),
            range: DEFAULT_RANGE.to_string(),
            token_uri: "http://127.0.0.1:1/token".to_string(),
            api_base: "http://127.0.0.1:1".to_string(),
        },
        smtp: test_smtp_config(),
    }
}

pub fn test_smtp_config() -> SmtpConfig {
    SmtpConfig {
        host: "smtp.test.local".to_string(),
        port: 465,
        user: "relay@test.local".to_string(),
        pass: "secret".to_string(),
        tls: TlsMode::Tls,
        from: "relay@test.local".to_string(),
        from_name: "Contact Form".to_string(),
        notify_email: "owner@test.local".to_string(),
        subject: "New message from Contact Form".to_string(),
    }
}

/// Spawn the app with default config and well-behaved collaborators.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), FakeStore::default(), FakeNotifier::default()).await
}

pub async fn spawn_app_with(config: Config, store: FakeStore, notifier: FakeNotifier) -> TestApp {
    let store = Arc::new(store);
    let notifier = Arc::new(notifier);

    let (app, _state) = contact_relay::build_app(config, store.clone(), notifier.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        store,
        notifier,
    }
}
