use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, identity, info, success, types::PkceSession, warning};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceSession>>>) {
    info!("Opening browser for sign-in...");
    match identity::sign_in(shared_state).await {
        Ok(user) => success!("Signed in as {}", user.username),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

pub async fn logout() {
    let logout_url = match identity::sign_out().await {
        Ok(url) => url,
        Err(e) => error!("Sign-out failed: {}", e),
    };

    if webbrowser::open(&logout_url).is_err() {
        warning!(
            "Failed to open browser. Visit the following URL to end the hosted UI session:\n{}",
            logout_url
        )
    }

    success!("Signed out.");
}

pub async fn whoami() {
    let user = super::signed_in_user().await;
    info!("Username: {}", user.username);
    info!("Email: {}", user.email.as_deref().unwrap_or("-"));
}
