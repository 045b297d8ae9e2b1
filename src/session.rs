//! Session context: the auth token and the login-return path.
//!
//! The token is the one process-wide shared resource. Reads are synchronous
//! and side-effect-free; set/unset are the only mutations and are never
//! concurrent with each other in a single-user session. The login-return
//! path records where to navigate back to after a forced login and is
//! consumed exactly once.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{PeonyAdminError, Result};

/// Key-value collaborator holding the session token and the login-return
/// path.
pub trait SessionStore: Send + Sync {
    /// Current auth token, if any.
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> Result<()>;

    fn unset_token(&self) -> Result<()>;

    /// Path to navigate back to after a successful login, if one was
    /// recorded.
    fn login_from(&self) -> Option<String>;

    fn set_login_from(&self, path: &str) -> Result<()>;

    fn unset_login_from(&self) -> Result<()>;

    /// Consume the login-return path: read it and clear it so a later login
    /// cannot redirect to a stale target.
    fn take_login_from(&self) -> Option<String> {
        let path = self.login_from();
        if path.is_some() {
            let _ = self.unset_login_from();
        }
        path
    }

    /// Whether a token is currently available.
    fn token_available(&self) -> bool {
        self.token().is_some()
    }
}

#[derive(Debug, Default)]
struct SessionData {
    token: Option<String>,
    login_from: Option<String>,
}

// A poisoned lock still holds coherent session data; recover the guard
// instead of panicking.
fn locked(data: &Mutex<SessionData>) -> MutexGuard<'_, SessionData> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory session store, for tests and embedders that manage persistence
/// themselves.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        locked(&self.data).token.clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        locked(&self.data).token = Some(token.to_string());
        Ok(())
    }

    fn unset_token(&self) -> Result<()> {
        locked(&self.data).token = None;
        Ok(())
    }

    fn login_from(&self) -> Option<String> {
        locked(&self.data).login_from.clone()
    }

    fn set_login_from(&self, path: &str) -> Result<()> {
        locked(&self.data).login_from = Some(path.to_string());
        Ok(())
    }

    fn unset_login_from(&self) -> Result<()> {
        locked(&self.data).login_from = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    token: Option<String>,
}

/// File-backed session store.
///
/// The token is persisted to a TOML file so it survives process restarts.
/// The login-return path is deliberately session-scoped: it lives only in
/// memory and evaporates with the process, so a stale target can never leak
/// into a later session.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    data: Mutex<SessionData>,
}

impl FileSessionStore {
    /// Open the store, loading any previously persisted token.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let token = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let persisted: PersistedSession = toml::from_str(&content)?;
            persisted.token
        } else {
            None
        };

        Ok(Self {
            path,
            data: Mutex::new(SessionData {
                token,
                login_from: None,
            }),
        })
    }

    fn persist(&self, token: &Option<String>) -> Result<()> {
        let persisted = PersistedSession {
            token: token.clone(),
        };
        let content = toml::to_string(&persisted)
            .map_err(|e| PeonyAdminError::session_store(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        locked(&self.data).token.clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut data = locked(&self.data);
        data.token = Some(token.to_string());
        self.persist(&data.token)
    }

    fn unset_token(&self) -> Result<()> {
        let mut data = locked(&self.data);
        data.token = None;
        self.persist(&data.token)
    }

    fn login_from(&self) -> Option<String> {
        locked(&self.data).login_from.clone()
    }

    fn set_login_from(&self, path: &str) -> Result<()> {
        locked(&self.data).login_from = Some(path.to_string());
        Ok(())
    }

    fn unset_login_from(&self) -> Result<()> {
        locked(&self.data).login_from = None;
        Ok(())
    }
}
