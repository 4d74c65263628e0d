use chrono::Utc;
use uuid::Uuid;

use crate::config::ValidationMode;
use crate::error::SubmitError;
use crate::models::Submission;
use crate::state::SharedState;

use super::fields::ContactForm;
use super::honeypot;
use super::metadata::RequestMeta;

pub struct PipelineResult {
    pub submission_id: Option<Uuid>,
    pub spam: bool,
}

/// Record the submission, then notify the operator. Each downstream call is
/// attempted exactly once; a stored row is never rolled back.
pub async fn run(
    state: &SharedState,
    meta: &RequestMeta,
    raw_data: serde_json::Value,
) -> Result<PipelineResult, SubmitError> {
    if let Err(retry_after) = state.submission_limiter.check(meta.ip) {
        return Err(SubmitError::RateLimited { retry_after });
    }

    if honeypot::is_spam(&raw_data, state.config.honeypot_field.as_deref()) {
        tracing::info!(ip = %meta.ip, "Honeypot triggered, dropping submission");
        return Ok(PipelineResult {
            submission_id: None,
            spam: true,
        });
    }

    let form = ContactForm::extract(&raw_data).map_err(SubmitError::Input)?;

    let warnings = form.validate();
    if !warnings.is_empty() {
        match state.config.validation {
            ValidationMode::Strict => return Err(SubmitError::Input(warnings.join("; "))),
            ValidationMode::Lenient => {
                tracing::warn!(ip = %meta.ip, "Accepting submission with warnings: {:?}", warnings)
            }
        }
    }

    let (name, email, message) = form.into_parts();
    let submission = Submission::new(name, email, message, Utc::now());
    let submission_id = submission.id();

    tracing::debug!(
        %submission_id,
        ip = %meta.ip,
        user_agent = %meta.user_agent,
        "Recording submission"
    );

    state
        .store
        .append_row(&submission.row())
        .await
        .map_err(|cause| SubmitError::Persistence {
            submission_id,
            cause,
        })?;

    tracing::info!(%submission_id, "Submission recorded");

    if let Err(cause) = state.notifier.notify(&submission).await {
        // Nothing retries this; the row in the sheet and this event are the only trace.
        tracing::error!(
            %submission_id,
            name = %submission.name(),
            email = %submission.email(),
            body = %submission.message(),
            submitted_at = %submission.submitted_at_iso(),
            %cause,
            "Recorded but not notified"
        );
        return Err(SubmitError::Notification {
            submission_id,
            cause,
        });
    }

    tracing::info!(%submission_id, "Operator notified");

    Ok(PipelineResult {
        submission_id: Some(submission_id),
        spam: false,
    })
}
