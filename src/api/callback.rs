use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{identity::exchange_code_pkce, types::PkceSession, warning};

/// Receives the hosted UI redirect and finishes the PKCE exchange.
///
/// The outcome is written into the shared state, where the waiting sign-in
/// flow picks it up: a session on success, a failure message otherwise.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PkceSession>>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(pkce) = state.as_mut() else {
        return Html("<h4>No sign-in in progress.</h4>");
    };

    if let Some(err) = params.get("error") {
        let description = params
            .get("error_description")
            .map(String::as_str)
            .unwrap_or_default();
        pkce.failure = Some(format!("Sign-in rejected: {err} {description}").trim().to_string());
        return Html("<h4>Login failed.</h4>");
    }

    if params.get("state") != Some(&pkce.state) {
        pkce.failure = Some("Sign-in callback state does not match".to_string());
        return Html("<h4>Login failed.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    match exchange_code_pkce(code, &pkce.code_verifier).await {
        Ok(session) => {
            pkce.session = Some(session);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            pkce.failure = Some(format!("Token exchange failed: {e}"));
            Html("<h4>Login failed.</h4>")
        }
    }
}
