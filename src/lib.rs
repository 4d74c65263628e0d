pub mod config;
pub mod error;
pub mod state;
pub mod models;
pub mod routes;
pub mod email;
pub mod sheets;
pub mod submission;
pub mod rate_limit;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::{Notifier, SmtpNotifier};
use crate::rate_limit::SubmissionRateLimiter;
use crate::sheets::{RecordStore, SheetsClient};
use crate::state::{AppState, SharedState};

/// Construct the production collaborators from configuration.
pub fn build_clients(config: &Config) -> Result<(Arc<dyn RecordStore>, Arc<dyn Notifier>), String> {
    let store = SheetsClient::new(config.sheets.clone())?;
    let notifier = SmtpNotifier::new(config.smtp.clone())?;

    tracing::info!(
        spreadsheet = %config.sheets.spreadsheet_id,
        smtp_host = %config.smtp.host,
        "Downstream clients configured"
    );

    Ok((Arc::new(store), Arc::new(notifier)))
}

pub fn build_app(
    config: Config,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
) -> (Router, SharedState) {
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        submission_limiter: SubmissionRateLimiter::new(
            config.rate_limit,
            config.rate_limit_window_secs,
        ),
        config,
        store,
        notifier,
    });

    let app = Router::new()
        .merge(routes::contact_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Rejections surface in the contact handler, which answers them as JSON.
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

/// Periodically drop closed rate-limit windows until the state is dropped.
pub fn spawn_limiter_cleanup(state: &SharedState) -> tokio::task::JoinHandle<()> {
    let state = Arc::downgrade(state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let Some(state) = state.upgrade() else {
                break;
            };
            state.submission_limiter.cleanup();
        }
    })
}

async fn health() -> &'static str {
    "ok"
}
