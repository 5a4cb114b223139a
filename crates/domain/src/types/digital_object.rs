//! Payloads for creating digital objects and linking them as instances

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file version attached to a digital object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVersion {
    /// Link to the file itself.
    pub file_uri: String,
    /// How the staff/public interface should open the link.
    pub xlink_show_attribute: String,
    /// When the link should be resolved.
    pub xlink_actuate_attribute: String,
}

impl FileVersion {
    /// File version that opens in a new window on request, the default for
    /// access links.
    pub fn access_link(file_uri: impl Into<String>) -> Self {
        Self {
            file_uri: file_uri.into(),
            xlink_show_attribute: "new".into(),
            xlink_actuate_attribute: "onRequest".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DigitalObjectNote {
    #[serde(rename = "type")]
    note_type: String,
    content: Vec<String>,
    publish: bool,
    jsonmodel_type: String,
}

/// Payload for `POST /repositories/:repo/digital_objects`.
///
/// Mirrors the minimal record the staff interface creates for access
/// copies: a title, one note, and one file version.
#[derive(Debug, Clone, Serialize)]
pub struct NewDigitalObject {
    title: String,
    digital_object_id: String,
    publish: bool,
    notes: Vec<DigitalObjectNote>,
    file_versions: Vec<FileVersion>,
}

impl NewDigitalObject {
    /// Build a published digital object with a generated UUID identifier
    /// and an "access item" note.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            digital_object_id: Uuid::new_v4().to_string(),
            publish: true,
            notes: vec![DigitalObjectNote {
                note_type: "note".into(),
                content: vec!["access item".into()],
                publish: true,
                jsonmodel_type: "note_digital_object".into(),
            }],
            file_versions: vec![FileVersion::access_link(link)],
        }
    }

    /// Use a caller-supplied identifier instead of a generated UUID.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.digital_object_id = identifier.into();
        self
    }

    /// Replace the default "access item" note content.
    #[must_use]
    pub fn with_note(mut self, content: impl Into<String>) -> Self {
        if let Some(note) = self.notes.first_mut() {
            note.content = vec![content.into()];
        }
        self
    }

    /// Mark the digital object unpublished.
    #[must_use]
    pub const fn unpublished(mut self) -> Self {
        self.publish = false;
        self
    }

    /// Identifier that will be posted as `digital_object_id`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.digital_object_id
    }
}

/// Instance payload linking a digital object to an archival object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalObjectInstance {
    /// Always `digital_object` for this instance kind.
    pub instance_type: String,
    /// Ref to the digital object record.
    pub digital_object: super::RecordRef,
}

impl DigitalObjectInstance {
    /// Build an instance pointing at an existing digital object URI.
    pub fn new(digital_object_uri: impl Into<String>) -> Self {
        Self {
            instance_type: "digital_object".into(),
            digital_object: super::RecordRef::new(digital_object_uri),
        }
    }
}
