//! Configuration management for the fragments CLI.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the fragments
//! service endpoint, the Cognito identity provider settings and other runtime
//! parameters.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::Res;

/// Base URL used when `FRAGMENTS_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const DEFAULT_COGNITO_REGION: &str = "us-east-1";

pub const DEFAULT_COGNITO_SCOPE: &str = "phone openid email";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// variables from `fragcli/.env` inside the platform-specific local data
/// directory. A missing file is not an error: every setting can also come
/// from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/fragcli/.env`
/// - macOS: `~/Library/Application Support/fragcli/.env`
/// - Windows: `%LOCALAPPDATA%/fragcli/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("fragcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

/// Returns the fragments microservice base URL.
///
/// Reads `FRAGMENTS_API_URL` and falls back to [`DEFAULT_API_URL`] for local
/// development. Resolved once when the client is built.
///
/// # Example
///
/// ```
/// let api_url = api_url(); // e.g., "http://localhost:8080"
/// ```
pub fn api_url() -> String {
    resolve_api_url(env::var("FRAGMENTS_API_URL").ok())
}

/// Normalizes a configured base URL.
///
/// Blank values select the default and a trailing slash is removed.
pub fn resolve_api_url(raw: Option<String>) -> String {
    match raw {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}

/// Returns the AWS region hosting the Cognito user pool.
pub fn cognito_region() -> String {
    env::var("COGNITO_REGION").unwrap_or_else(|_| DEFAULT_COGNITO_REGION.to_string())
}

/// Returns the Cognito user pool ID (`COGNITO_POOL_ID`).
pub fn cognito_pool_id() -> Res<String> {
    require("COGNITO_POOL_ID")
}

/// Returns the Cognito app client ID (`COGNITO_CLIENT_ID`).
pub fn cognito_client_id() -> Res<String> {
    require("COGNITO_CLIENT_ID")
}

/// Returns the Cognito hosted UI domain without a trailing slash.
///
/// # Example
///
/// ```
/// let domain = cognito_domain()?; // e.g., "https://fragments.auth.us-east-1.amazoncognito.com"
/// ```
pub fn cognito_domain() -> Res<String> {
    Ok(require("COGNITO_DOMAIN")?.trim_end_matches('/').to_string())
}

/// Returns the OAuth redirect URL registered for the app client.
///
/// The local callback server binds to this URL's host and port and serves
/// the callback on its path.
pub fn redirect_url() -> Res<String> {
    require("OAUTH_SIGN_IN_REDIRECT_URL")
}

/// Returns the scopes requested at sign-in.
pub fn cognito_scope() -> String {
    env::var("COGNITO_SCOPE").unwrap_or_else(|_| DEFAULT_COGNITO_SCOPE.to_string())
}

/// Returns the OIDC issuer of the user pool.
///
/// # Example
///
/// ```
/// let authority = cognito_authority()?;
/// // "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_abc123"
/// ```
pub fn cognito_authority() -> Res<String> {
    Ok(authority_for(&cognito_region(), &cognito_pool_id()?))
}

pub fn authority_for(region: &str, pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{pool_id}")
}

/// Whether `FRAGCLI_DEBUG` asks for request tracing on stderr.
pub fn debug_enabled() -> bool {
    env::var_os("FRAGCLI_DEBUG").is_some_and(|v| !v.is_empty())
}

fn require(key: &str) -> Res<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{key} must be set").into()),
    }
}
