//! Unpublish sweeps
//!
//! Records and notes are unpublished in place: fetch, flip the `publish`
//! flag, post back. The restriction sweeps walk a resource's archival
//! objects and unpublish access-restriction notes that have lapsed.

use aspace_domain::types::UnpublishedRestriction;
use aspace_domain::utils::record_format::{note_text, restriction_expired};
use aspace_domain::Result;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::AspaceClient;

impl AspaceClient {
    /// Unpublish a record by URI. Returns `false` when it was already
    /// unpublished.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn unpublish_record(&self, uri: &str) -> Result<bool> {
        let mut record = self.get_record(uri).await?;
        if record.get("publish").and_then(Value::as_bool) != Some(true) {
            return Ok(false);
        }
        record["publish"] = Value::Bool(false);
        self.update_record(uri, &record).await?;
        info!(uri, "unpublished record");
        Ok(true)
    }

    /// Unpublish a resource by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn unpublish_resource(&self, resource_id: u64) -> Result<bool> {
        self.unpublish_record(&self.repo_uri(&format!("/resources/{resource_id}"))).await
    }

    /// Unpublish access-restriction notes whose machine-readable end date
    /// has passed, across every archival object of a resource.
    ///
    /// Returns a log of what was unpublished.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn unpublish_expired_restrictions(
        &self,
        resource_id: u64,
    ) -> Result<Vec<UnpublishedRestriction>> {
        let today = Utc::now().date_naive();
        self.unpublish_restrictions_where(resource_id, |text| restriction_expired(text, today))
            .await
    }

    /// Unpublish access-restriction notes whose text equals
    /// `restriction_text`, across every archival object of a resource.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn unpublish_restrictions_matching(
        &self,
        resource_id: u64,
        restriction_text: &str,
    ) -> Result<Vec<UnpublishedRestriction>> {
        self.unpublish_restrictions_where(resource_id, |text| text == restriction_text).await
    }

    async fn unpublish_restrictions_where<F>(
        &self,
        resource_id: u64,
        should_unpublish: F,
    ) -> Result<Vec<UnpublishedRestriction>>
    where
        F: Fn(&str) -> bool,
    {
        let object_uris = self.get_resource_archival_object_uris(resource_id).await?;

        let mut unpublished = Vec::new();
        for object_uri in object_uris {
            let mut record = self.get_record(&object_uri).await?;
            let title = record_display(&record);
            let mut changed = false;

            if let Some(notes) = record.get_mut("notes").and_then(Value::as_array_mut) {
                for note in notes {
                    let is_published_restriction = note.get("type").and_then(Value::as_str)
                        == Some("accessrestrict")
                        && note.get("publish").and_then(Value::as_bool) == Some(true);
                    if !is_published_restriction {
                        continue;
                    }
                    let Some(text) = note_text(note) else {
                        continue;
                    };
                    if should_unpublish(&text) {
                        note["publish"] = Value::Bool(false);
                        changed = true;
                        unpublished.push(UnpublishedRestriction {
                            uri: object_uri.clone(),
                            title: title.clone(),
                            restriction: text,
                        });
                    }
                }
            }

            if changed {
                self.update_record(&object_uri, &record).await?;
            }
        }

        info!(resource_id, count = unpublished.len(), "unpublished lapsed restrictions");
        Ok(unpublished)
    }
}

fn record_display(record: &Value) -> String {
    record
        .get("display_string")
        .and_then(Value::as_str)
        .map_or_else(String::new, ToString::to_string)
}
