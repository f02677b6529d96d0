use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{TokenPair, User};

/// Credentials of the signed-in user.
///
/// Owned by the API client through a [`SharedSession`] handle; persisted only
/// through [`SessionStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Bearer token, ignoring blank values
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn login(&mut self, tokens: TokenPair) {
        self.access_token = Some(tokens.access);
        self.refresh_token = Some(tokens.refresh);
        if tokens.user.is_some() {
            self.user = tokens.user;
        }
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }
}

/// Session handle shared between the API client and whoever signs in or out.
///
/// The client reads the token from here on every request, so there is one
/// place that decides whether the user is authenticated.
pub type SharedSession = Arc<RwLock<Session>>;

pub fn shared(session: Session) -> SharedSession {
    Arc::new(RwLock::new(session))
}

/// JSON file holding the session between runs
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

    /// Load the stored session; a missing file is an empty session.
    pub async fn load(&self) -> Result<Session> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let session = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Failed to parse session file {}", self.path.display()))?;
                debug!("Loaded session from {}", self.path.display());
                Ok(session)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Session::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read session file {}", self.path.display())),
        }
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        info!("💾 Saved session to {}", self.path.display());
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove session file {}", self.path.display())),
        }
    }
}
