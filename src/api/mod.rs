//! # API Module
//!
//! HTTP endpoints of the short-lived local server that receives the Cognito
//! hosted UI redirect during `fragcli auth`.
//!
//! ## Endpoints
//!
//! - [`callback`] - Completes the authorization code + PKCE exchange and hands
//!   the tokens to the waiting sign-in flow.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use fragcli::api::callback;
//!
//! let app = Router::new().route("/", get(callback).layer(Extension(state)));
//! ```

mod callback;

pub use callback::callback;
