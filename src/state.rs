use std::sync::Arc;

use crate::config::Config;
use crate::email::Notifier;
use crate::rate_limit::SubmissionRateLimiter;
use crate::sheets::RecordStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn Notifier>,
    pub submission_limiter: SubmissionRateLimiter,
}
