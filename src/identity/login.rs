use std::{sync::Arc, time::Duration};

use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    Res, config, debug,
    management::SessionManager,
    server,
    types::{PkceSession, Session},
    utils, warning,
};

use super::user::User;

/// How long to wait for the browser to come back to the callback server.
const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the hosted UI sign-in flow and caches the resulting session.
///
/// 1. Generates a PKCE verifier/challenge pair and a `state` value
/// 2. Binds the local callback server to the redirect URL's host and port
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback handler to exchange the code for tokens
/// 5. Persists the session for later commands
///
/// # Errors
///
/// Missing configuration, a callback server that cannot bind, an identity
/// provider error, a failed token exchange, or no callback within two
/// minutes.
pub async fn sign_in(shared_state: Arc<Mutex<Option<PkceSession>>>) -> Res<User> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let redirect_url = config::redirect_url()?;
    let auth_url = authorization_url(
        &config::cognito_domain()?,
        &config::cognito_client_id()?,
        &redirect_url,
        &config::cognito_scope(),
        &state,
        &code_challenge,
    )?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceSession {
            code_verifier,
            state,
            session: None,
            failure: None,
        });
    }

    let listener = server::bind(&redirect_url).await?;
    let callback_path = Url::parse(&redirect_url)?.path().to_string();
    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        server::start_api_server(listener, &callback_path, server_state).await
    });

    debug!("Authorization URL: {}", auth_url);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = wait_for_session(shared_state).await;
    server.abort();

    let session = outcome?;
    SessionManager::new(session.clone())
        .persist()
        .await
        .map_err(|e| format!("Failed to save session to cache: {e}"))?;

    User::from_session(&session)
}

/// Builds the hosted UI `/oauth2/authorize` URL for the code flow with S256 PKCE.
pub fn authorization_url(
    domain: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
    code_challenge: &str,
) -> Res<String> {
    let url = Url::parse_with_params(
        &format!("{domain}/oauth2/authorize"),
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope),
            ("state", state),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
        ],
    )?;
    Ok(url.to_string())
}

/// Polls the shared state once a second until the callback stored a session
/// or a failure, or the timeout elapses.
async fn wait_for_session(shared_state: Arc<Mutex<Option<PkceSession>>>) -> Res<Session> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < SIGN_IN_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(pkce) = lock.as_ref() {
            if let Some(session) = &pkce.session {
                return Ok(session.clone());
            }
            if let Some(failure) = &pkce.failure {
                return Err(failure.clone().into());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err("Sign-in timed out".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_carries_pkce_parameters() {
        let url = authorization_url(
            "https://frag.auth.us-east-1.amazoncognito.com",
            "client123",
            "http://localhost:1234",
            "phone openid email",
            "xyz",
            "challenge",
        )
        .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let query: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.path(), "/oauth2/authorize");
        assert!(query.contains(&("response_type".to_string(), "code".to_string())));
        assert!(query.contains(&("scope".to_string(), "phone openid email".to_string())));
        assert!(query.contains(&("code_challenge_method".to_string(), "S256".to_string())));
        assert!(query.contains(&("redirect_uri".to_string(), "http://localhost:1234".to_string())));
        assert!(query.contains(&("state".to_string(), "xyz".to_string())));
    }

    #[tokio::test]
    async fn wait_returns_callback_failure() {
        let state = Arc::new(Mutex::new(Some(PkceSession {
            code_verifier: "v".to_string(),
            state: "s".to_string(),
            session: None,
            failure: Some("access_denied".to_string()),
        })));

        let err = wait_for_session(state).await.unwrap_err();
        assert_eq!(err.to_string(), "access_denied");
    }
}
