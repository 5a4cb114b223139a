//! Session login against the ArchivesSpace backend
//!
//! ArchivesSpace issues a session token from
//! `POST /users/:username/login`; every later request carries it in the
//! `X-ArchivesSpace-Session` header.

use aspace_domain::{AspaceError, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{info, warn};

use crate::http::HttpClient;

/// An authenticated session token.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
}

impl Session {
    /// The raw token value sent in the session header.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    session: Option<String>,
}

/// Log in and obtain a session token.
///
/// # Errors
/// Returns [`AspaceError::Auth`] when the server rejects the credentials
/// or responds without a session token; transport failures surface as
/// [`AspaceError::Network`].
pub async fn login(
    http: &HttpClient,
    backend_url: &str,
    username: &str,
    password: &str,
    expiring: bool,
) -> Result<Session> {
    let url = format!("{backend_url}/users/{username}/login");
    let request = http
        .request(Method::POST, &url)
        .query(&[("password", password), ("expiring", if expiring { "true" } else { "false" })]);

    let response = http.send(request).await?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AspaceError::Network(format!("failed to read login response: {e}")))?;

    if !status.is_success() {
        warn!(%status, username, "login rejected");
        return Err(AspaceError::Auth(format!(
            "login failed for user '{username}' (HTTP {status}): {body}"
        )));
    }

    let parsed: LoginResponse = serde_json::from_str(&body).map_err(|_| {
        AspaceError::Auth(format!("login response was not the expected JSON document: {body}"))
    })?;

    match parsed.session {
        Some(token) if !token.is_empty() => {
            info!(username, "logged in to ArchivesSpace");
            Ok(Session { token })
        }
        _ => Err(AspaceError::Auth(format!("no session token in login response: {body}"))),
    }
}
