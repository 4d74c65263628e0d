use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Claims of a service-account assertion exchanged for an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(client_email: &str, token_uri: &str) -> Self {
        let now = Utc::now();
        Self {
            iss: client_email.to_string(),
            scope: SPREADSHEETS_SCOPE.to_string(),
            aud: token_uri.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

pub fn encode_assertion(claims: &AssertionClaims, private_key_pem: &str) -> Result<String, String> {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| format!("Invalid service account key: {e}"))?;

    encode(&Header::new(Algorithm::RS256), claims, &key)
        .map_err(|e| format!("JWT encode failed: {e}"))
}
