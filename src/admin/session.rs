use std::fs;
use std::path::PathBuf;

use crate::clients::backend::BackendClient;
use crate::error::{AppError, AppResult};

/// The single persisted admin credential, stored in a file at a fixed
/// path. Load, save and clear are its only operations; nothing else in
/// the codebase touches the file.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn save(&self, token: &str) -> AppResult<()> {
        fs::write(&self.path, token)
            .map_err(|err| AppError::Internal(format!("Failed to persist admin token: {}", err)))
    }

    pub fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to clear admin token: {}", err);
            }
        }
    }
}

/// Gate in front of the admin dashboard. Holds the in-memory token for
/// the current session; the store is consulted once on restore.
pub struct SessionGuard {
    store: TokenStore,
    token: Option<String>,
}

impl SessionGuard {
    pub fn new(store: TokenStore) -> Self {
        Self { store, token: None }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// On load: no stored token means straight to the login form. A
    /// stored token gets exactly one verification call; any refusal or
    /// failure clears the store and signs out, with no bookings fetch.
    pub async fn restore(&mut self, backend: &BackendClient) -> bool {
        let Some(token) = self.store.load() else {
            self.token = None;
            return false;
        };
        match backend.admin_verify(&token).await {
            Ok(true) => {
                self.token = Some(token);
                true
            }
            Ok(false) | Err(_) => {
                self.store.clear();
                self.token = None;
                false
            }
        }
    }

    pub async fn login(
        &mut self,
        backend: &BackendClient,
        username: &str,
        password: &str,
    ) -> AppResult<()> {
        let token = backend.admin_login(username, password).await?;
        self.store.save(&token)?;
        self.token = Some(token);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.store.clear();
        self.token = None;
    }
}
