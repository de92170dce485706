use std::fmt;

use reqwest::{StatusCode, header::InvalidHeaderValue};

/// Error returned by every fragments operation except the best-effort listing.
#[derive(Debug)]
pub enum FragmentsError {
    /// The request never produced a response (connection refused, DNS, TLS).
    Transport(reqwest::Error),
    /// The service answered with a non-2xx status.
    ///
    /// `message` is the server's `error.message` when the body carried one,
    /// otherwise `"{status} {reason}"`.
    Status { status: StatusCode, message: String },
    /// A 2xx body could not be read or decoded.
    Body(reqwest::Error),
    /// The credential or the caller's content type is not a valid header value.
    Header(InvalidHeaderValue),
    /// The base URL or fragment id does not make a usable request URL.
    Url(String),
}

impl FragmentsError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FragmentsError::Status { status, .. } => Some(*status),
            FragmentsError::Transport(err) | FragmentsError::Body(err) => err.status(),
            FragmentsError::Header(_) | FragmentsError::Url(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for FragmentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentsError::Transport(err) => write!(f, "request failed: {err}"),
            FragmentsError::Status { message, .. } => f.write_str(message),
            FragmentsError::Body(err) => write!(f, "malformed response body: {err}"),
            FragmentsError::Header(err) => write!(f, "invalid header value: {err}"),
            FragmentsError::Url(msg) => write!(f, "invalid request url: {msg}"),
        }
    }
}

impl std::error::Error for FragmentsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FragmentsError::Transport(err) | FragmentsError::Body(err) => Some(err),
            FragmentsError::Header(err) => Some(err),
            FragmentsError::Status { .. } | FragmentsError::Url(_) => None,
        }
    }
}

impl From<InvalidHeaderValue> for FragmentsError {
    fn from(err: InvalidHeaderValue) -> Self {
        FragmentsError::Header(err)
    }
}

impl From<url::ParseError> for FragmentsError {
    fn from(err: url::ParseError) -> Self {
        FragmentsError::Url(err.to_string())
    }
}
