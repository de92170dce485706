use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Res, config,
    types::{IdTokenClaims, Session},
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Exchanges an authorization code for the user's tokens using PKCE.
///
/// Posts to the hosted UI's `/oauth2/token` endpoint with the
/// `authorization_code` grant. The verifier must be the one whose challenge
/// was sent with the authorization request.
///
/// # Errors
///
/// Network failures, a non-2xx answer (expired or reused code, verifier
/// mismatch) and a response without an ID token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Res<Session> {
    let token_url = format!("{}/oauth2/token", config::cognito_domain()?);
    let client_id = config::cognito_client_id()?;
    let redirect_uri = config::redirect_url()?;

    let res = Client::new()
        .post(&token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let tokens: TokenResponse = res.json().await?;

    Ok(Session {
        id_token: tokens.id_token,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        obtained_at: Utc::now().timestamp().max(0) as u64,
    })
}

/// Reads the claims of a JWT without verifying its signature.
///
/// Only used to show who is signed in and to match the issuer against the
/// configured pool; the fragments service does the real verification.
pub fn decode_claims(jwt: &str) -> Res<IdTokenClaims> {
    let payload = jwt
        .split('.')
        .nth(1)
        .ok_or("ID token is not a JWT")?
        .trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}
