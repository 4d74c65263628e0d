use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// One visitor message plus the server-assigned receipt time. Write-once.
#[derive(Debug, Clone)]
pub struct Submission {
    id: Uuid,
    name: String,
    email: String,
    message: String,
    submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(name: String, email: String, message: String, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            message,
            submitted_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// ISO-8601 with millisecond precision and a `Z` suffix.
    pub fn submitted_at_iso(&self) -> String {
        self.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The four ordered cells written to the record store.
    pub fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.message.clone(),
            self.submitted_at_iso(),
        ]
    }
}
