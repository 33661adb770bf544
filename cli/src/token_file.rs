//! File-backed token store for the terminal client.
//!
//! The token lives in one file (default `$HOME/.learnhub/auth_token`) so
//! consecutive invocations share a session the way browser tabs share
//! `localStorage`. I/O failures are logged and treated as "no token".

#[cfg(test)]
#[path = "token_file_test.rs"]
mod token_file_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use session::TokenStore;

/// Env var overriding the token file location.
pub const TOKEN_FILE_ENV: &str = "LEARNHUB_TOKEN_FILE";

#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.learnhub/auth_token`, or `./.learnhub/auth_token` without a home dir.
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        home.join(".learnhub").join(session::token::TOKEN_STORAGE_KEY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw.trim().to_owned()).filter(|token| !token.is_empty()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read token file");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %err, "failed to create token directory");
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, token) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to write token file");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(path = %self.path.display(), error = %err, "failed to remove token file"),
        }
    }
}
