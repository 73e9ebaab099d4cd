//! On-disk session persistence for the logged-in user.
//!
//! Stores the [`AuthUser`] returned by login (bearer token included) as JSON
//! in the session directory so later processes can pick the session up
//! without logging in again. The store is only read when the SDK is built and
//! written on login/logout; requests never consult it.

use crate::config;
use crate::error::Result;
use crate::models::AuthUser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Loads, saves and clears the persisted session.
pub struct SessionStore {
    /// Directory holding `session.json`.
    pub session_dir: PathBuf,
    /// If false, nothing is read from or written to disk.
    pub persist: bool,
}

impl SessionStore {
    /// Create a session store.
    ///
    /// If `session_dir` is `None`, uses the platform-appropriate config
    /// directory. Creates the directory when persistence is enabled.
    pub fn new(session_dir: Option<PathBuf>, persist: bool) -> Result<Self> {
        let dir = session_dir.unwrap_or_else(config::default_session_dir);
        if persist {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self {
            session_dir: dir,
            persist,
        })
    }

    /// A store that never touches the filesystem.
    pub fn ephemeral() -> Self {
        Self {
            session_dir: PathBuf::new(),
            persist: false,
        }
    }

    fn session_path(&self) -> PathBuf {
        self.session_dir.join(config::SESSION_FILE)
    }

    /// Load the persisted user, if any.
    ///
    /// A corrupt session file is deleted and treated as no session.
    pub fn load(&self) -> Option<AuthUser> {
        if !self.persist {
            return None;
        }
        let path = self.session_path();
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<AuthUser>(&contents) {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "loaded persisted session");
                Some(user)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "corrupt session file -- removing"
                );
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Persist the user.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated session behind. The file holds the
    /// bearer token and is readable by the owner only (0600 on unix).
    pub fn save(&self, user: &AuthUser) -> Result<()> {
        if !self.persist {
            return Ok(());
        }
        write_private(&self.session_path(), &serde_json::to_vec_pretty(user)?)
    }

    /// Remove the persisted session, if present.
    pub fn clear(&self) -> Result<()> {
        if !self.persist {
            return Ok(());
        }
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.persist && self.session_path().exists()
    }
}

/// Write `bytes` to `dest` through an owner-only temp file in the same
/// directory. The temp file is deleted if anything fails before the rename.
fn write_private(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    tmp.as_file_mut().write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
