//! Record fragments shared across endpoints

use serde::{Deserialize, Serialize};

/// A `{"ref": "/some/uri"}` pointer to another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    /// URI of the referenced record.
    #[serde(rename = "ref")]
    pub uri: String,
}

impl RecordRef {
    /// Wrap a URI in a ref pointer.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Trailing path segment of the URI, which ArchivesSpace uses as the
    /// numeric record id.
    #[must_use]
    pub fn record_id(&self) -> Option<&str> {
        self.uri.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// Response shape of `/repositories/:repo/find_by_id/archival_objects`.
#[derive(Debug, Clone, Deserialize)]
pub struct FindByIdResults {
    /// Matching archival objects, as ref pointers.
    pub archival_objects: Vec<RecordRef>,
}

/// One access restriction that a publishing sweep unpublished.
#[derive(Debug, Clone, Serialize)]
pub struct UnpublishedRestriction {
    /// URI of the archival object that carried the note.
    pub uri: String,
    /// Display string of that archival object.
    pub title: String,
    /// The restriction text that was unpublished.
    pub restriction: String,
}
