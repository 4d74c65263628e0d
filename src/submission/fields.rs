use serde_json::Value;

/// The three visitor-supplied fields, as loosely as they arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    /// Pull the known fields out of a parsed payload. Anything else is ignored,
    /// including client-supplied timestamps.
    pub fn extract(raw: &Value) -> Result<Self, String> {
        let Some(obj) = raw.as_object() else {
            return Err("Expected an object payload".to_string());
        };

        Ok(Self {
            name: obj.get("name").and_then(as_text),
            email: obj.get("email").and_then(as_text),
            message: obj.get("message").and_then(as_text),
        })
    }

    /// Field problems. Returns warnings (doesn't reject).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.name.as_deref() {
            None => warnings.push("Missing required field: name".to_string()),
            Some(s) if s.trim().is_empty() => {
                warnings.push("Required field is empty: name".to_string())
            }
            _ => {}
        }

        match self.email.as_deref() {
            None => warnings.push("Missing required field: email".to_string()),
            Some(s) if !s.contains('@') => {
                warnings.push("Invalid email format: email".to_string())
            }
            _ => {}
        }

        match self.message.as_deref() {
            None => warnings.push("Missing required field: message".to_string()),
            Some(s) if s.trim().is_empty() => {
                warnings.push("Required field is empty: message".to_string())
            }
            _ => {}
        }

        warnings
    }

    /// Absent fields become empty strings.
    pub fn into_parts(self) -> (String, String, String) {
        (
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.message.unwrap_or_default(),
        )
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
