//! The ArchivesSpace client
//!
//! One [`AspaceClient`] holds a logged-in session against a single
//! backend. Endpoint methods are grouped by concern:
//! - [`records`]: getters for the standard record types and id resolution
//! - [`trees`]: resource trees and instance cleanup
//! - [`containers`]: top containers
//! - [`publishing`]: unpublish sweeps for expired restrictions
//! - [`agents`]: agent/subject heading helpers that follow refs
//! - [`admin`]: enumerations and EAD export

pub mod admin;
pub mod agents;
pub mod containers;
pub mod publishing;
pub mod records;
pub mod trees;

use std::time::Duration;

use aspace_domain::constants::{DEFAULT_TIMEOUT_SECS, SESSION_HEADER};
use aspace_domain::{AspaceConfig, AspaceError, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::TransportError;
use crate::http::HttpClient;
use crate::session::{self, Session};

pub use admin::EadExportOptions;

/// Client for one ArchivesSpace backend, holding an authenticated session.
#[derive(Debug)]
pub struct AspaceClient {
    backend_url: String,
    frontend_url: Option<String>,
    repository_uri: String,
    http: HttpClient,
    session: Session,
}

impl AspaceClient {
    /// Validate the configuration, log in, and return a ready client.
    ///
    /// # Errors
    /// Returns [`AspaceError::Config`] for incomplete configuration before
    /// any request is made, [`AspaceError::Auth`] when login is rejected,
    /// and [`AspaceError::Network`] for transport failures.
    pub async fn connect(config: AspaceConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("aspace-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::connect_with_http(config, http).await
    }

    /// Like [`Self::connect`], with a caller-supplied HTTP client.
    ///
    /// # Errors
    /// Same failure modes as [`Self::connect`].
    pub async fn connect_with_http(config: AspaceConfig, http: HttpClient) -> Result<Self> {
        config.validate()?;

        let backend_url = config.backend_url.trim_end_matches('/').to_string();
        // validate() guarantees a non-empty password.
        let password = config.password.clone().unwrap_or_default();
        let session = session::login(
            &http,
            &backend_url,
            &config.username,
            &password,
            config.expiring_session,
        )
        .await?;

        info!(backend = %backend_url, repository = config.repository, "client connected");

        let repository_uri = config.repository_uri();
        Ok(Self {
            backend_url,
            frontend_url: config
                .frontend_url
                .map(|url| url.trim_end_matches('/').to_string()),
            repository_uri,
            http,
            session,
        })
    }

    /// URI prefix for repository-scoped endpoints, e.g. `/repositories/2`.
    #[must_use]
    pub fn repository_uri(&self) -> &str {
        &self.repository_uri
    }

    /// The session token issued at login.
    #[must_use]
    pub fn session_token(&self) -> &str {
        self.session.token()
    }

    /// End the session on the server side.
    ///
    /// # Errors
    /// Surfaces transport or server errors from the logout endpoint.
    pub async fn logout(&self) -> Result<()> {
        self.post_record("/logout", None).await.map(|_| ())
    }

    /* ---------------------------------------------------------------- */
    /* Raw passthrough                                                   */
    /* ---------------------------------------------------------------- */

    /// GET an ArchivesSpace URI and return the JSON response.
    ///
    /// # Errors
    /// 404 maps to [`AspaceError::NotFound`], 401/403 to
    /// [`AspaceError::Auth`], other non-2xx statuses to
    /// [`AspaceError::Communication`]; a 2xx non-JSON body is
    /// [`AspaceError::Internal`].
    pub async fn get_record(&self, uri: &str) -> Result<Value> {
        self.request_json(Method::GET, uri, &[], None).await
    }

    /// GET with query parameters.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_record_with_params(
        &self,
        uri: &str,
        params: &[(&str, String)],
    ) -> Result<Value> {
        self.request_json(Method::GET, uri, params, None).await
    }

    /// POST a JSON body (or nothing) to an ArchivesSpace URI.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn post_record(&self, uri: &str, body: Option<&Value>) -> Result<Value> {
        self.request_json(Method::POST, uri, &[], body).await
    }

    /// POST with query parameters.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn post_record_with_params(
        &self,
        uri: &str,
        body: Option<&Value>,
        params: &[(&str, String)],
    ) -> Result<Value> {
        self.request_json(Method::POST, uri, params, body).await
    }

    /// DELETE an ArchivesSpace record.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn delete_record(&self, uri: &str) -> Result<Value> {
        self.request_json(Method::DELETE, uri, &[], None).await
    }

    /// POST an updated record back to its own URI.
    ///
    /// # Errors
    /// Returns [`AspaceError::InvalidInput`] without issuing a request when
    /// `uri` does not match the record's own `uri` field; otherwise the
    /// mapping of [`Self::get_record`] applies.
    pub async fn update_record(&self, uri: &str, record: &Value) -> Result<Value> {
        let record_uri = record.get("uri").and_then(Value::as_str).unwrap_or_default();
        if record_uri != uri {
            return Err(AspaceError::InvalidInput(format!(
                "cannot update record: supplied URI {uri} does not match record URI {record_uri}"
            )));
        }
        self.post_record(uri, Some(record)).await
    }

    /* ---------------------------------------------------------------- */
    /* Staff-interface links                                             */
    /* ---------------------------------------------------------------- */

    /// Staff-interface URL for a resource.
    ///
    /// # Errors
    /// Returns [`AspaceError::Config`] when no `frontend_url` is
    /// configured.
    pub fn resource_link(&self, resource_id: u64) -> Result<String> {
        Ok(format!("{}/resources/{resource_id}", self.frontend_base()?))
    }

    /// Staff-interface URL that opens a resource tree at an archival
    /// object.
    ///
    /// # Errors
    /// Returns [`AspaceError::Config`] when no `frontend_url` is
    /// configured.
    pub fn archival_object_link(&self, resource_id: u64, archival_object_uri: &str) -> Result<String> {
        let object_id = archival_object_uri.rsplit('/').next().unwrap_or_default();
        Ok(format!(
            "{}/resources/{resource_id}#tree::archival_object_{object_id}",
            self.frontend_base()?
        ))
    }

    /// Staff-interface link derived from an archival object record already
    /// in hand.
    ///
    /// # Errors
    /// Returns [`AspaceError::InvalidInput`] when the record lacks a
    /// resource ref, and [`AspaceError::Config`] without a `frontend_url`.
    pub fn archival_object_link_from_record(&self, archival_object: &Value) -> Result<String> {
        let resource_ref = archival_object
            .pointer("/resource/ref")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AspaceError::InvalidInput("archival object record has no resource ref".into())
            })?;
        let resource_id = resource_ref.rsplit('/').next().unwrap_or_default().parse::<u64>()
            .map_err(|_| {
                AspaceError::InvalidInput(format!("resource ref is not numeric: {resource_ref}"))
            })?;
        let object_uri = archival_object
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| AspaceError::InvalidInput("archival object record has no uri".into()))?;
        self.archival_object_link(resource_id, object_uri)
    }

    /// Staff-interface link for an archival object id, fetching the record
    /// to find its resource.
    ///
    /// # Errors
    /// Same failure modes as [`Self::get_record`] plus the link-building
    /// errors of [`Self::archival_object_link_from_record`].
    pub async fn archival_object_link_from_id(&self, archival_object_id: u64) -> Result<String> {
        let record = self.get_archival_object(archival_object_id).await?;
        self.archival_object_link_from_record(&record)
    }

    fn frontend_base(&self) -> Result<&str> {
        self.frontend_url.as_deref().ok_or_else(|| {
            AspaceError::Config("no frontend_url configured; cannot build staff links".into())
        })
    }

    /* ---------------------------------------------------------------- */
    /* Internals shared by the endpoint modules                          */
    /* ---------------------------------------------------------------- */

    pub(crate) fn repo_uri(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.repository_uri)
    }

    async fn request_json(
        &self,
        method: Method,
        uri: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let text = self.request_text(method, uri, params, body).await?;
        serde_json::from_str(&text).map_err(|_| {
            AspaceError::Internal(format!(
                "ArchivesSpace responded successfully for {uri} but returned a non-JSON document"
            ))
        })
    }

    pub(crate) async fn request_text(
        &self,
        method: Method,
        uri: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<String> {
        let url = format!("{}{uri}", self.backend_url);
        let mut builder =
            self.http.request(method, &url).header(SESSION_HEADER, self.session.token());
        if !params.is_empty() {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| AspaceError::from(TransportError::from(err)))?;

        if !status.is_success() {
            debug!(%status, uri, "request rejected");
            return Err(AspaceError::from_status(
                status.as_u16(),
                format!("{uri}: {}", summarize(&text)),
            ));
        }
        Ok(text)
    }
}

/// Keep server payloads in error messages readable.
fn summarize(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty response body)";
    }
    // Truncate on a char boundary so long HTML error pages stay short.
    match trimmed.char_indices().nth(500) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}
