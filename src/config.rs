use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub validation: ValidationMode,
    pub honeypot_field: Option<String>,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub trusted_proxies: Vec<IpNet>,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub sheets: SheetsConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub client_email: String,
    pub private_key: String,
    pub spreadsheet_id: String,
    pub range: String,
    pub token_uri: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub tls: TlsMode,
    pub from: String,
    pub from_name: String,
    pub notify_email: String,
    pub subject: String,
}

/// How strictly inbound form fields are checked before anything is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationMode {
    /// Absent fields become empty strings; problems are only logged.
    Lenient,
    /// Any field problem rejects the submission.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TlsMode {
    Tls,
    StartTls,
    None,
}

pub const DEFAULT_RANGE: &str = "Sheet1!A:D";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("CONTACT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_HOST: {e}"))?;

        let port: u16 = env_or("CONTACT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_PORT: {e}"))?;

        let max_body_size: usize = env_or("CONTACT_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_MAX_BODY_SIZE: {e}"))?;

        let validation = match env_or("CONTACT_VALIDATION", "lenient").as_str() {
            "strict" => ValidationMode::Strict,
            "lenient" => ValidationMode::Lenient,
            other => return Err(format!("Invalid CONTACT_VALIDATION: {other}")),
        };

        let honeypot_field = std::env::var("CONTACT_HONEYPOT_FIELD")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let rate_limit: u32 = env_or("CONTACT_RATE_LIMIT", "5")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("CONTACT_RATE_LIMIT_WINDOW_SECS", "600")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("CONTACT_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid CONTACT_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors_origins: Vec<String> = env_or("CONTACT_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_level = env_or("CONTACT_LOG_LEVEL", "info");

        let sheets = SheetsConfig {
            client_email: env_required("GOOGLE_CLIENT_EMAIL")?,
            private_key: normalize_private_key(&env_required("GOOGLE_PRIVATE_KEY")?),
            spreadsheet_id: env_required("GOOGLE_SHEET_ID")?,
            range: env_or("GOOGLE_SHEET_RANGE", DEFAULT_RANGE),
            token_uri: env_or("GOOGLE_TOKEN_URI", DEFAULT_TOKEN_URI),
            api_base: env_or("GOOGLE_SHEETS_API_BASE", DEFAULT_SHEETS_API_BASE),
        };

        let tls = match env_or("SMTP_TLS", "tls").as_str() {
            "tls" => TlsMode::Tls,
            "starttls" => TlsMode::StartTls,
            "none" => TlsMode::None,
            other => return Err(format!("Invalid SMTP_TLS: {other}")),
        };

        let user = env_required("SMTP_USER")?;
        let smtp = SmtpConfig {
            host: env_required("SMTP_HOST")?,
            port: env_required("SMTP_PORT")?
                .parse()
                .map_err(|e| format!("Invalid SMTP_PORT: {e}"))?,
            from: env_or("CONTACT_SMTP_FROM", &user),
            user,
            pass: env_required("SMTP_PASS")?,
            tls,
            from_name: env_or("CONTACT_FROM_NAME", "Contact Form"),
            notify_email: env_required("NOTIFY_EMAIL")?,
            subject: env_or("CONTACT_SUBJECT", "New message from Contact Form"),
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            validation,
            honeypot_field,
            rate_limit,
            rate_limit_window_secs,
            trusted_proxies,
            cors_origins,
            log_level,
            sheets,
            smtp,
        })
    }
}

/// Keys pasted into a single-line env var usually carry literal `\n` escapes.
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
