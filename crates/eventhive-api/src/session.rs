//! Authentication context and its on-disk storage.
//!
//! A [`Session`] is handed explicitly to every client method that needs a
//! bearer token. [`SessionStore`] keeps it between CLI invocations at
//! `~/.cache/eh/session.json`.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default session filename.
const SESSION_FILENAME: &str = "session.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "eh";

/// Who the token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// An authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token returned by sign-in.
    pub token: String,
    #[serde(default)]
    pub role: Role,
    /// Email used to sign in, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session stamped with the current time.
    pub fn new(token: impl Into<String>, role: Role, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            role,
            email,
            created_at: Some(Utc::now()),
        }
    }

    /// A session built from a raw token, e.g. one passed on the command line.
    pub fn from_token(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            role,
            email: None,
            created_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Errors that can occur while persisting a session.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Failed to determine the XDG cache directory.
    #[error("failed to determine session directory: no valid home directory found")]
    NoSessionDir,

    #[error("failed to read session file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write session file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create session directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete session file '{path}': {source}")]
    DeleteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The session file exists but cannot be parsed.
    #[error("session file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent storage for the current session.
///
/// # Example
///
/// ```no_run
/// use eventhive_api::session::{Role, Session, SessionStore};
///
/// let store = SessionStore::new()?;
/// store.save(&Session::new("token", Role::User, None))?;
/// let session = store.load_optional()?;
/// assert!(session.is_some());
/// store.clear()?;
/// # Ok::<(), eventhive_api::session::SessionStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store at the default XDG cache path.
    pub fn new() -> Result<Self, SessionStoreError> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// On Unix: `~/.cache/eh/session.json`
    pub fn default_path() -> Result<PathBuf, SessionStoreError> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(SessionStoreError::NoSessionDir)?;
        Ok(project_dirs.cache_dir().join(SESSION_FILENAME))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the stored session. A missing file is a `ReadError`.
    pub fn load(&self) -> Result<Session, SessionStoreError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| SessionStoreError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads the stored session, returning `None` when nobody is signed in.
    pub fn load_optional(&self) -> Result<Option<Session>, SessionStoreError> {
        match self.load() {
            Ok(session) => Ok(Some(session)),
            Err(SessionStoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the session atomically (temp file + rename).
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionStoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(session)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| SessionStoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        restrict_permissions(&temp_path);
        fs::rename(&temp_path, &self.path).map_err(|e| SessionStoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), role = %session.role, "session saved");
        Ok(())
    }

    /// Removes the stored session. Succeeds if there is none.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        debug!(error = %e, "could not restrict session file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) {}
