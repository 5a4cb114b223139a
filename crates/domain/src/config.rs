//! Configuration structures for the ArchivesSpace client
//!
//! The loader that fills these from the environment or from config files
//! lives in the client crate; this module only defines the shape and the
//! validation rules.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REPOSITORY;
use crate::errors::{AspaceError, Result};

/// Connection settings for one ArchivesSpace instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspaceConfig {
    /// Base URL of the backend API, e.g. `https://aspace.example.edu/api`.
    pub backend_url: String,
    /// Base URL of the staff interface, used only for link building.
    #[serde(default)]
    pub frontend_url: Option<String>,
    /// Username to authenticate as.
    pub username: String,
    /// Password; optional in stored configuration, required to connect.
    #[serde(default)]
    pub password: Option<String>,
    /// Repository id that scopes repository-bound endpoints.
    #[serde(default = "default_repository")]
    pub repository: u32,
    /// Whether to request an expiring session token.
    #[serde(default = "default_expiring")]
    pub expiring_session: bool,
}

const fn default_repository() -> u32 {
    DEFAULT_REPOSITORY
}

const fn default_expiring() -> bool {
    true
}

impl AspaceConfig {
    /// Build a configuration with defaults for the optional fields.
    pub fn new(backend_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            frontend_url: None,
            username: username.into(),
            password: None,
            repository: DEFAULT_REPOSITORY,
            expiring_session: true,
        }
    }

    /// Set the password used at login.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the staff-interface URL used for link building.
    #[must_use]
    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = Some(url.into());
        self
    }

    /// Set the repository id.
    #[must_use]
    pub const fn with_repository(mut self, repository: u32) -> Self {
        self.repository = repository;
        self
    }

    /// URI prefix for repository-scoped endpoints, e.g. `/repositories/2`.
    #[must_use]
    pub fn repository_uri(&self) -> String {
        format!("/repositories/{}", self.repository)
    }

    /// Check that the configuration is complete enough to connect.
    ///
    /// # Errors
    /// Returns [`AspaceError::Config`] naming the first missing or
    /// malformed field. Construction must fail here, not on first use.
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(AspaceError::Config("backend_url must not be empty".into()));
        }
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(AspaceError::Config(format!(
                "backend_url must be an http(s) URL, got: {}",
                self.backend_url
            )));
        }
        if self.username.trim().is_empty() {
            return Err(AspaceError::Config("username must not be empty".into()));
        }
        match &self.password {
            Some(p) if !p.is_empty() => Ok(()),
            _ => Err(AspaceError::Config(
                "no password configured; set ASPACE_PASSWORD or add one to the config file".into(),
            )),
        }
    }
}
