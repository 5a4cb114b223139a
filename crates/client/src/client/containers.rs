//! Top container endpoints

use aspace_domain::{AspaceError, Result};
use serde_json::Value;
use tracing::info;

use super::AspaceClient;

impl AspaceClient {
    /// Fetch a top container by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_top_container(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/top_containers/{id}"))).await
    }

    /// Look up a top container by barcode.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn find_top_container_by_barcode(&self, barcode: &str) -> Result<Value> {
        self.get_record_with_params(
            &self.repo_uri("/find_by_barcode/container"),
            &[("barcode", barcode.to_string())],
        )
        .await
    }

    /// Post an updated top container record back to its URI.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn update_top_container(&self, id: u64, container: &Value) -> Result<Value> {
        self.post_record(&self.repo_uri(&format!("/top_containers/{id}")), Some(container)).await
    }

    /// Create a top container and return its URI.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`], plus
    /// [`AspaceError::Internal`] when the response carries no URI.
    pub async fn create_top_container(
        &self,
        container_type: &str,
        indicator: &str,
        barcode: Option<&str>,
    ) -> Result<String> {
        let mut body = serde_json::json!({
            "indicator": indicator,
            "type": container_type,
            "jsonmodel_type": "top_container",
        });
        if let Some(barcode) = barcode {
            body["barcode"] = Value::String(barcode.to_string());
        }

        let response = self.post_record(&self.repo_uri("/top_containers"), Some(&body)).await?;
        response
            .get("uri")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| {
                AspaceError::Internal(format!("top container response has no uri: {response}"))
            })
    }

    /// Metadata for a container: the archival objects that reference it.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_container_metadata(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/metadata_for_container/{id}"))).await
    }

    /// Merge one top container into another.
    ///
    /// Every archival object instance referencing the source container is
    /// rewritten to the target, then the source container is deleted.
    /// Returns the number of archival objects updated.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`]; a failed update aborts the
    /// merge before the source is deleted.
    pub async fn merge_top_containers(&self, source_id: u64, target_id: u64) -> Result<usize> {
        let source_uri = self.repo_uri(&format!("/top_containers/{source_id}"));
        let target_uri = self.repo_uri(&format!("/top_containers/{target_id}"));

        let metadata = self.get_container_metadata(source_id).await?;
        let object_uris: Vec<String> = metadata
            .get("archival_objects")
            .and_then(Value::as_array)
            .map(|objects| {
                objects
                    .iter()
                    .filter_map(|o| o.get("archival_object_uri").and_then(Value::as_str))
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut updated = 0;
        for object_uri in &object_uris {
            let mut record = self.get_record(object_uri).await?;
            if repoint_instances(&mut record, &source_uri, &target_uri) {
                self.update_record(object_uri, &record).await?;
                updated += 1;
            }
        }

        self.delete_record(&source_uri).await?;
        info!(source = %source_uri, target = %target_uri, updated, "merged top containers");
        Ok(updated)
    }
}

/// Rewrite sub-container refs from `source_uri` to `target_uri`. Returns
/// whether anything changed.
fn repoint_instances(record: &mut Value, source_uri: &str, target_uri: &str) -> bool {
    let Some(instances) = record.get_mut("instances").and_then(Value::as_array_mut) else {
        return false;
    };

    let mut changed = false;
    for instance in instances {
        if let Some(container_ref) = instance.pointer_mut("/sub_container/top_container/ref") {
            if container_ref.as_str() == Some(source_uri) {
                *container_ref = Value::String(target_uri.to_string());
                changed = true;
            }
        }
    }
    changed
}
