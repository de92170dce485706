use std::{fmt, io::Error, path::PathBuf};

use chrono::Utc;

use crate::types::Session;

/// Seconds before the real expiry at which a session is treated as expired.
const EXPIRY_BUFFER_SECS: u64 = 60;

#[derive(Debug)]
pub enum SessionError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for SessionError {
    fn from(err: Error) -> Self {
        SessionError::IoError(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::IoError(e) => write!(f, "session cache: {e}"),
            SessionError::SerdeError(e) => write!(f, "session cache is corrupt: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Cached sign-in tokens at `<data_local_dir>/fragcli/cache/session.json`.
pub struct SessionManager {
    session: Session,
    path: PathBuf,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        Self::with_path(session, Self::session_path())
    }

    pub fn with_path(session: Session, path: PathBuf) -> Self {
        SessionManager { session, path }
    }

    pub async fn load() -> Result<Self, SessionError> {
        Self::load_from(Self::session_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, SessionError> {
        let content = async_fs::read_to_string(&path).await?;
        let session: Session = serde_json::from_str(&content).map_err(SessionError::SerdeError)?;
        Ok(Self { session, path })
    }

    pub async fn persist(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.session).map_err(SessionError::SerdeError)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Removes the cache file. Succeeds when there was nothing to remove.
    pub async fn clear() -> Result<(), SessionError> {
        Self::clear_at(Self::session_path()).await
    }

    pub async fn clear_at(path: PathBuf) -> Result<(), SessionError> {
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::IoError(e)),
        }
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        is_expired_at(&self.session, now)
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    fn session_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("fragcli/cache/session.json");
        path
    }
}

fn is_expired_at(session: &Session, now: u64) -> bool {
    let expires_at = session.obtained_at.saturating_add(session.expires_in);
    now.saturating_add(EXPIRY_BUFFER_SECS) >= expires_at
}
