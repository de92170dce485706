//! # Identity Module
//!
//! Sign-in against the Cognito hosted UI and the signed-in [`User`] that the
//! fragments client uses as its credential.
//!
//! ## Flow
//!
//! 1. [`sign_in`] generates a PKCE verifier, challenge and `state`
//! 2. The browser is sent to `{COGNITO_DOMAIN}/oauth2/authorize`
//! 3. The hosted UI redirects to `OAUTH_SIGN_IN_REDIRECT_URL`, served by the
//!    local callback server ([`crate::server`], [`crate::api::callback`])
//! 4. [`exchange_code_pkce`] trades the code for ID, access and refresh tokens
//! 5. The session is cached by [`crate::management::SessionManager`]
//!
//! Later commands call [`current_user`]. There is no silent renewal: an
//! expired session means signing in again. [`sign_out`] drops the cache and
//! returns the hosted UI logout URL.

mod login;
mod token;
mod user;

pub use login::{authorization_url, sign_in};
pub use token::{decode_claims, exchange_code_pkce};
pub use user::{User, current_user, logout_url, sign_out};
