pub mod auth;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;

use crate::config::SheetsConfig;

use auth::{AssertionClaims, TokenResponse, JWT_BEARER_GRANT};

/// Append-only tabular store that receives one row per submission.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append_row(&self, row: &[String]) -> Result<(), String>;
}

/// Google Sheets `values.append` client authenticated as a service account.
pub struct SheetsClient {
    client: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    /// Exchange a freshly signed assertion for an access token.
    pub async fn access_token(&self) -> Result<String, String> {
        let claims = AssertionClaims::new(&self.config.client_email, &self.config.token_uri);
        let assertion = auth::encode_assertion(&claims, &self.config.private_key)?;

        let resp = self
            .client
            .post(&self.config.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| format!("Token request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncated_body(resp).await;
            return Err(format!("Token endpoint returned {status}: {body}"));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| format!("Invalid token response: {e}"))?;

        Ok(token.access_token)
    }

    pub fn append_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| format!("Invalid Sheets API base: {e}"))?;

        let range = format!("{}:append", self.config.range);
        url.path_segments_mut()
            .map_err(|_| "Sheets API base cannot be a base URL".to_string())?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);

        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        Ok(url)
    }
}

#[async_trait]
impl RecordStore for SheetsClient {
    async fn append_row(&self, row: &[String]) -> Result<(), String> {
        let token = self.access_token().await?;
        let url = self.append_url()?;

        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| format!("Sheets append request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncated_body(resp).await;
            return Err(format!("Sheets append returned {status}: {body}"));
        }

        Ok(())
    }
}

async fn truncated_body(resp: reqwest::Response) -> String {
    resp.text()
        .await
        .unwrap_or_default()
        .chars()
        .take(1024)
        .collect()
}
