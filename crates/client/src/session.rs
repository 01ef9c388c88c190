//! The signed-in user, kept in a JSON file between runs.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::User;

/// A signed-in user and their bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// File-backed session.
///
/// A missing or unreadable file means nobody is signed in.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Open the store at `path`, loading any saved session.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = read_session(&path);
        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    /// Store a new session and write it to disk.
    pub fn login(&mut self, session: Session) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(&session)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        tracing::debug!(user_id = session.user.id, path = %self.path.display(), "Session saved");
        self.current = Some(session);
        Ok(())
    }

    /// Replace the stored user after a profile edit, keeping the token.
    pub fn update_user(&mut self, user: User) -> io::Result<()> {
        match self.current.take() {
            Some(session) => self.login(Session { user, ..session }),
            None => Ok(()),
        }
    }

    /// Forget the session and remove the file.
    pub fn logout(&mut self) -> io::Result<()> {
        self.current = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn read_session(path: &Path) -> Option<Session> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Session file unreadable");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt session file");
            None
        }
    }
}
