//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel runs
//! - Client creation from an explicit session file path
//! - The interactive login challenge for unauthorized sessions

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::client::updates::UpdatesLike;
use grammers_client::{Client, SignInError};
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::prompt;

/// Session file path for an account: `<dir>/<username>.session`.
///
/// The platform client persists authorization state here, so later runs
/// skip the login challenge entirely.
pub fn session_file(dir: &Path, username: &str) -> PathBuf {
    dir.join(format!("{}.session", username))
}

/// Lock file path guarding the session file of an account.
pub fn lock_file(dir: &Path, username: &str) -> PathBuf {
    dir.join(format!("{}.session.lock", username))
}

/// Session lock guard that ensures exclusive access to the session file.
///
/// Telegram requires sequential use of one session; a second concurrent
/// run would corrupt it.
pub struct SessionLock {
    lock_file: Option<File>,
    path: PathBuf,
}

impl SessionLock {
    /// Acquire an exclusive lock at `path`.
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                lock_file: Some(lock_file),
                path: path.to_path_buf(),
            }),
            Err(_) => Err(Error::SessionLocked),
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Holder for SenderPool components and Client
pub struct TelegramClient {
    pub client: Client,
    pub handle: SenderPoolHandle,
    _updates: mpsc::UnboundedReceiver<UpdatesLike>,
    _runner_handle: tokio::task::JoinHandle<()>,
}

impl TelegramClient {
    /// Open (or create) the session file at `session_path` and connect.
    pub async fn connect(session_path: &Path, api_id: i32) -> Result<Self> {
        let path_str = session_path.to_string_lossy();
        let session = SqliteSession::open(path_str.as_ref())
            .map_err(|e| Error::SessionOpen(path_str.to_string(), e.to_string()))?;
        let session = Arc::new(session);

        let pool = SenderPool::new(session, api_id);

        // Create client from pool (need reference to whole pool)
        let client = Client::new(&pool);

        // Get handle and runner after client is created
        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;

        // Spawn the runner in background
        let runner_handle = tokio::spawn(async move {
            runner.run().await;
        });

        Ok(Self {
            client,
            handle,
            _updates: updates,
            _runner_handle: runner_handle,
        })
    }
}

// Implement Deref to allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Run the login challenge if the session is not yet authorized.
///
/// An authorized session is reused without any prompt. Otherwise a one-time
/// code is sent to the configured phone and read from stdin; if the account
/// has two-factor auth enabled, the password is prompted for once. A wrong
/// code or password is fatal.
pub async fn authorize(client: &TelegramClient, credentials: &Credentials) -> Result<()> {
    if client.is_authorized().await? {
        info!("Session for {} is already authorized", credentials.username);
        return Ok(());
    }

    info!("Requesting login code for {}", credentials.phone);
    let token = client
        .request_login_code(&credentials.phone, &credentials.api_hash)
        .await
        .map_err(|e| Error::SignInFailed(format!("Failed to request code: {}", e)))?;

    let code = prompt::read_line("Enter the code: ")?;

    match client.sign_in(&token, &code).await {
        Ok(user) => {
            info!("Signed in as {}", user.full_name());
            Ok(())
        }
        Err(SignInError::PasswordRequired(password_token)) => {
            let password = prompt::read_line("Password: ")?;
            let user = client
                .check_password(password_token, password)
                .await
                .map_err(|e| Error::SignInFailed(format!("Failed to verify password: {}", e)))?;
            info!("Signed in as {}", user.full_name());
            Ok(())
        }
        Err(e) => Err(Error::SignInFailed(format!("Failed to sign in: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn session_file_derives_from_username() {
        let path = session_file(Path::new("sessions"), "alice");
        assert_eq!(path, Path::new("sessions/alice.session"));
    }

    #[test]
    fn lock_file_sits_next_to_session_file() {
        let path = lock_file(Path::new("sessions"), "alice");
        assert_eq!(path, Path::new("sessions/alice.session.lock"));
    }

    #[test]
    fn lock_file_is_created_on_acquire() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("test.session.lock");

        assert!(!path.exists());
        let mut lock = SessionLock::acquire(&path).expect("lock");
        assert!(path.exists());
        lock.release();
    }

    #[test]
    fn release_removes_lock_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("test.session.lock");

        let mut lock = SessionLock::acquire(&path).expect("lock");
        assert!(path.exists());
        lock.release();
        assert!(!path.exists());
    }

    #[test]
    fn lock_dropped_releases_automatically() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("test.session.lock");

        {
            let _lock = SessionLock::acquire(&path).expect("lock");
            assert!(path.exists());
        }
        // Lock should be released after drop
        assert!(!path.exists());
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("test.session.lock");

        let mut first = SessionLock::acquire(&path).expect("first lock");

        let second = SessionLock::acquire(&path);
        assert!(matches!(second, Err(Error::SessionLocked)));

        first.release();

        let third = SessionLock::acquire(&path);
        assert!(third.is_ok());
    }

    #[test]
    fn double_release_is_safe() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("test.session.lock");

        let mut lock = SessionLock::acquire(&path).expect("lock");
        lock.release();
        lock.release(); // Should not panic
    }
}
