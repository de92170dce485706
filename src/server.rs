use axum::{Extension, Router, routing::get};
use reqwest::Url;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Res, api, types::PkceSession};

/// Binds the callback listener to the redirect URL's host and port.
///
/// Done before the browser is opened so that a port already in use is
/// reported instead of leaving the identity provider redirecting into the void.
pub async fn bind(redirect_url: &str) -> Res<TcpListener> {
    let url = Url::parse(redirect_url)?;
    let host = url
        .host_str()
        .ok_or_else(|| format!("Redirect URL has no host: {redirect_url}"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| format!("Redirect URL has no port: {redirect_url}"))?;

    TcpListener::bind((host, port))
        .await
        .map_err(|e| format!("Failed to bind callback server on {host}:{port}: {e}").into())
}

pub async fn start_api_server(
    listener: TcpListener,
    callback_path: &str,
    state: Arc<Mutex<Option<PkceSession>>>,
) -> Res<()> {
    let path = if callback_path.is_empty() {
        "/"
    } else {
        callback_path
    };
    let app = Router::new().route(path, get(api::callback).layer(Extension(state)));

    axum::serve(listener, app).await?;
    Ok(())
}
