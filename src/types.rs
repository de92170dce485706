use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Fragment metadata as returned by the fragments service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Body of `GET /v1/fragments?expand=1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentList {
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

/// Body of a successful create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    pub fragment: Fragment,
}

/// Success acknowledgement returned by `DELETE /v1/fragments/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub status: String,
}

/// Structured error body, `{ "error": { "code": 404, "message": "..." } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Tabled)]
pub struct FragmentTableRow {
    pub id: String,
    #[tabled(rename = "type")]
    pub content_type: String,
    pub size: String,
    pub created: String,
    pub updated: String,
}

#[derive(Tabled)]
pub struct ConversionTableRow {
    pub extension: String,
    pub label: String,
    pub mime: String,
}

/// Tokens issued by the hosted UI, as cached between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id_token: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Sign-in state shared between the login flow and the callback handler.
#[derive(Debug, Clone)]
pub struct PkceSession {
    pub code_verifier: String,
    pub state: String,
    pub session: Option<Session>,
    pub failure: Option<String>,
}

/// Claims read from the ID token for display and issuer checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdTokenClaims {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
