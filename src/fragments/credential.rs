use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue};

/// Content type the credential is asked for on requests without a body.
pub const DEFAULT_HEADER_CONTENT_TYPE: &str = "application/json";

/// Capability that produces authorization headers for one request.
///
/// The client asks for headers on every call and never stores or inspects
/// what comes back. Token lifecycle belongs to whoever implements this.
pub trait Credential: Send + Sync {
    fn authorization_headers(&self, content_type: &str) -> Result<HeaderMap, InvalidHeaderValue>;
}

/// Bearer token credential: `Authorization: Bearer <token>` plus `Content-Type`.
#[derive(Debug, Clone)]
pub struct BearerCredential {
    token: String,
}

impl BearerCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Credential for BearerCredential {
    fn authorization_headers(&self, content_type: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        bearer_headers(&self.token, content_type)
    }
}

/// Builds the `Content-Type` and bearer `Authorization` pair.
pub fn bearer_headers(token: &str, content_type: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}
