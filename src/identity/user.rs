use reqwest::{
    Url,
    header::{HeaderMap, InvalidHeaderValue},
};

use crate::{
    Res, config,
    fragments::{Credential, bearer_headers},
    management::SessionManager,
    types::Session,
};

use super::token::decode_claims;

/// The signed-in user, as far as the fragments client is concerned.
///
/// Requests are authorized with the ID token, which is what the fragments
/// service's Cognito verifier expects.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub email: Option<String>,
    pub id_token: String,
}

impl User {
    /// Builds the user from a session's ID token claims.
    pub fn from_session(session: &Session) -> Res<Self> {
        let claims = decode_claims(&session.id_token)?;
        Ok(User {
            username: claims.username.unwrap_or_else(|| "unknown".to_string()),
            email: claims.email,
            id_token: session.id_token.clone(),
        })
    }
}

impl Credential for User {
    fn authorization_headers(&self, content_type: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        bearer_headers(&self.id_token, content_type)
    }
}

/// Returns the cached user, or an error telling the caller to sign in.
///
/// Expired sessions are rejected rather than renewed; sign in again to get
/// fresh tokens. When `COGNITO_POOL_ID` is set the token's issuer must be
/// that pool.
pub async fn current_user() -> Res<User> {
    let manager = SessionManager::load()
        .await
        .map_err(|e| format!("Not signed in ({e}). Run fragcli auth"))?;

    if manager.is_expired() {
        return Err("Session expired. Run fragcli auth".into());
    }

    let session = manager.current_session();
    if let Ok(authority) = config::cognito_authority() {
        let claims = decode_claims(&session.id_token)?;
        if claims.iss.as_deref() != Some(authority.as_str()) {
            return Err(format!(
                "Cached session was issued by {}, expected {}. Run fragcli auth",
                claims.iss.unwrap_or_default(),
                authority
            )
            .into());
        }
    }

    User::from_session(session)
}

/// Forgets the cached session and returns the hosted UI logout URL.
///
/// The URL still has to be visited for the identity provider to end its own
/// session; the CLI opens it in the browser.
pub async fn sign_out() -> Res<String> {
    SessionManager::clear().await?;
    logout_url(
        &config::cognito_domain()?,
        &config::cognito_client_id()?,
        &config::redirect_url()?,
    )
}

pub fn logout_url(domain: &str, client_id: &str, logout_uri: &str) -> Res<String> {
    let url = Url::parse_with_params(
        &format!("{domain}/logout"),
        &[("client_id", client_id), ("logout_uri", logout_uri)],
    )?;
    Ok(url.to_string())
}
