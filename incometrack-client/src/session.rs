/// Client session
///
/// A [`Session`] is the token plus the user it belongs to, persisted as JSON
/// by a [`SessionStore`]. [`SessionContext`] is the live handle every
/// request-issuing call receives: it loads whatever was stored (trusting the
/// token without re-validating it) and is invalidated, in memory and on
/// disk, as soon as the server answers 401.
///
/// # Example
///
/// ```no_run
/// use incometrack_client::session::{SessionContext, SessionStore};
///
/// # fn example() -> Result<(), incometrack_client::error::ClientError> {
/// let ctx = SessionContext::load(SessionStore::new(".incometrack/session.json"))?;
/// if let Some(user) = ctx.user() {
///     println!("Logged in as {}", user.email);
/// }
/// # Ok(())
/// # }
/// ```

use crate::error::ClientResult;
use incometrack_shared::models::user::UserProfile;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Token and user as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// JSON file holding at most one session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session, if any
    pub fn load(&self) -> ClientResult<Option<Session>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `session`, creating parent directories as needed
    pub fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    /// Removes the stored session; missing file is fine
    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session state shared by every API call of one front-end run
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    session: Option<Session>,
}

impl SessionContext {
    /// Restores the stored session
    pub fn load(store: SessionStore) -> ClientResult<Self> {
        let session = store.load()?;
        Ok(Self { store, session })
    }

    /// Context with nothing stored yet (nothing is read from disk)
    pub fn empty(store: SessionStore) -> Self {
        Self {
            store,
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Adopts and persists a fresh session
    pub fn establish(&mut self, session: Session) -> ClientResult<()> {
        self.store.save(&session)?;
        self.session = Some(session);
        Ok(())
    }

    /// Forgets the session in memory and on disk
    ///
    /// The in-memory session is dropped even if removing the file fails.
    pub fn invalidate(&mut self) -> ClientResult<()> {
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = %session.user.id, "Session cleared");
        }
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn temp_store() -> SessionStore {
        let dir = std::env::temp_dir().join(format!("incometrack-session-{}", Uuid::new_v4()));
        SessionStore::new(dir.join("nested").join("session.json"))
    }

    fn sample_session() -> Session {
        Session {
            token: "token-123".to_string(),
            user: UserProfile {
                id: Uuid::new_v4(),
                email: "user@example.com".to_string(),
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_missing_file_means_no_session() {
        let ctx = SessionContext::load(temp_store()).unwrap();
        assert!(!ctx.is_authenticated());
        assert!(ctx.token().is_none());
    }

    #[test]
    fn test_establish_persists_across_loads() {
        let store = temp_store();
        let session = sample_session();

        let mut ctx = SessionContext::empty(store.clone());
        ctx.establish(session.clone()).unwrap();
        assert_eq!(ctx.token(), Some("token-123"));

        let restored = SessionContext::load(store).unwrap();
        assert_eq!(restored.user(), Some(&session.user));
        assert_eq!(restored.token(), Some("token-123"));
    }

    #[test]
    fn test_invalidate_removes_file() {
        let store = temp_store();
        let mut ctx = SessionContext::empty(store.clone());
        ctx.establish(sample_session()).unwrap();
        assert!(store.path().exists());

        ctx.invalidate().unwrap();
        assert!(!ctx.is_authenticated());
        assert!(!store.path().exists());

        // Idempotent
        ctx.invalidate().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            SessionContext::load(store),
            Err(crate::error::ClientError::Serialization(_))
        ));
    }
}
