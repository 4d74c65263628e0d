use crate::models::Submission;

pub fn render_notification(submission: &Submission) -> String {
    format!(
        "New message from {} ({}):\n\n{}",
        submission.name(),
        submission.email(),
        submission.message()
    )
}
