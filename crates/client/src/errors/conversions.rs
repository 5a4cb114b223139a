//! Conversions from transport-layer errors into domain errors.

use aspace_domain::AspaceError;
use reqwest::Error as HttpError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the client side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct TransportError(pub AspaceError);

impl From<TransportError> for AspaceError {
    fn from(value: TransportError) -> Self {
        value.0
    }
}

impl From<AspaceError> for TransportError {
    fn from(value: AspaceError) -> Self {
        Self(value)
    }
}

impl From<HttpError> for TransportError {
    fn from(err: HttpError) -> Self {
        let message = err.to_string();
        let mapped = if err.is_timeout() {
            AspaceError::Network(format!("http request timed out: {message}"))
        } else if err.is_connect() {
            AspaceError::Network(format!("could not reach ArchivesSpace backend: {message}"))
        } else if err.is_decode() || err.is_body() {
            AspaceError::Internal(format!("failed to read http response body: {message}"))
        } else if err.is_builder() || err.is_request() {
            AspaceError::InvalidInput(format!("malformed http request: {message}"))
        } else {
            AspaceError::Network(format!("http error: {message}"))
        };
        Self(mapped)
    }
}

impl From<UrlError> for TransportError {
    fn from(err: UrlError) -> Self {
        Self(AspaceError::Config(format!("invalid URL in configuration: {err}")))
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self(AspaceError::Internal(format!(
            "ArchivesSpace returned a document that did not parse as expected: {err}"
        )))
    }
}
