//! Getters for the standard record types, listing, and id resolution

use aspace_domain::constants::{CHILDREN_JSONMODEL_TYPE, REF_ID_PREFIX};
use aspace_domain::types::{FindByIdResults, NewDigitalObject, RecordRef};
use aspace_domain::{AspaceError, Result};
use serde_json::Value;

use super::AspaceClient;

impl AspaceClient {
    /// Fetch an archival object by id.
    ///
    /// The returned record's `uri` matches the requested id; an unknown id
    /// surfaces [`AspaceError::NotFound`].
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_archival_object(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/archival_objects/{id}"))).await
    }

    /// Fetch the immediate children of an archival object.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_archival_object_children(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/archival_objects/{id}/children"))).await
    }

    /// Add children under an archival object.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn post_archival_object_children(
        &self,
        id: u64,
        children: Vec<Value>,
    ) -> Result<Value> {
        let body = serde_json::json!({
            "children": children,
            "jsonmodel_type": CHILDREN_JSONMODEL_TYPE,
        });
        self.post_record(&self.repo_uri(&format!("/archival_objects/{id}/children")), Some(&body))
            .await
    }

    /// List the ids of every resource in the repository.
    ///
    /// This is the `all_ids=true` form of the listing endpoint; only
    /// integers come back, never records.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`], plus
    /// [`AspaceError::Internal`] when the listing is not an id array.
    pub async fn list_resource_ids(&self) -> Result<Vec<u64>> {
        let listing = self
            .get_record_with_params(
                &self.repo_uri("/resources"),
                &[("all_ids", "true".to_string())],
            )
            .await?;
        serde_json::from_value(listing).map_err(|e| {
            AspaceError::Internal(format!("resource id listing was not an array of ids: {e}"))
        })
    }

    /// List full resource records for one page of the repository.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn list_resources(&self, page: u32) -> Result<Value> {
        self.get_record_with_params(
            &self.repo_uri("/resources"),
            &[("page", page.to_string())],
        )
        .await
    }

    /// Fetch a resource by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_resource(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/resources/{id}"))).await
    }

    /// Fetch an accession by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_accession(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/accessions/{id}"))).await
    }

    /// Fetch a subject by id. Subjects are global, not repository-scoped.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_subject(&self, id: u64) -> Result<Value> {
        self.get_record(&format!("/subjects/{id}")).await
    }

    /// Fetch an agent record by its full URI.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_agent(&self, agent_uri: &str) -> Result<Value> {
        self.get_record(agent_uri).await
    }

    /// Fetch a person agent by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_person(&self, id: u64) -> Result<Value> {
        self.get_agent(&format!("/agents/people/{id}")).await
    }

    /// Fetch a corporate entity agent by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_corporate_entity(&self, id: u64) -> Result<Value> {
        self.get_agent(&format!("/agents/corporate_entities/{id}")).await
    }

    /// Fetch a family agent by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_family(&self, id: u64) -> Result<Value> {
        self.get_agent(&format!("/agents/families/{id}")).await
    }

    /// Fetch a digital object by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_digital_object(&self, id: u64) -> Result<Value> {
        self.get_record(&self.repo_uri(&format!("/digital_objects/{id}"))).await
    }

    /// Create a digital object and return the new record's URI.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`], plus
    /// [`AspaceError::Internal`] when the response carries no URI.
    pub async fn create_digital_object(&self, digital_object: &NewDigitalObject) -> Result<String> {
        let body = serde_json::to_value(digital_object)
            .map_err(|e| AspaceError::Internal(format!("failed to serialize digital object: {e}")))?;
        let response = self.post_record(&self.repo_uri("/digital_objects"), Some(&body)).await?;
        response
            .get("uri")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| {
                AspaceError::Internal(format!("digital object response has no uri: {response}"))
            })
    }

    /* ---------------------------------------------------------------- */
    /* Identifier resolution                                             */
    /* ---------------------------------------------------------------- */

    /// Resolve an identifier to exactly one archival object ref.
    ///
    /// `kind` is an identifier field ArchivesSpace can search on, such as
    /// `ref_id` or `component_id`.
    ///
    /// # Errors
    /// Returns [`AspaceError::NotFound`] unless exactly one archival
    /// object matches; anything else would silently pick a record.
    pub async fn find_by_id(&self, kind: &str, value: &str) -> Result<RecordRef> {
        let key = format!("{kind}[]");
        let listing = self
            .get_record_with_params(
                &self.repo_uri("/find_by_id/archival_objects"),
                &[(key.as_str(), value.to_string())],
            )
            .await?;
        let results: FindByIdResults = serde_json::from_value(listing).map_err(|e| {
            AspaceError::Internal(format!("unexpected find_by_id response shape: {e}"))
        })?;

        match <[RecordRef; 1]>::try_from(results.archival_objects) {
            Ok([only]) => Ok(only),
            Err(matches) => Err(AspaceError::NotFound(format!(
                "error resolving {kind} {value}: {} archival objects returned",
                matches.len()
            ))),
        }
    }

    /// Resolve a component id to an archival object ref.
    ///
    /// # Errors
    /// Same as [`Self::find_by_id`].
    pub async fn resolve_component_id(&self, component_id: &str) -> Result<RecordRef> {
        self.find_by_id("component_id", component_id).await
    }

    /// Resolve a ref id to an archival object ref, tolerating the
    /// `aspace_` prefix EAD exports add.
    ///
    /// # Errors
    /// Same as [`Self::find_by_id`].
    pub async fn resolve_ref_id(&self, ref_id: &str) -> Result<RecordRef> {
        let bare = ref_id.strip_prefix(REF_ID_PREFIX).unwrap_or(ref_id);
        self.find_by_id("ref_id", bare).await
    }

    /* ---------------------------------------------------------------- */
    /* Structure changes                                                 */
    /* ---------------------------------------------------------------- */

    /// Move an archival object (and its subtree) to another resource.
    ///
    /// ArchivesSpace records a transfer event as a side effect; this
    /// method deletes that event so transfers leave no event clutter.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn transfer_archival_object(
        &self,
        archival_object_uri: &str,
        target_resource_uri: &str,
    ) -> Result<Value> {
        let response = self
            .post_record_with_params(
                &self.repo_uri("/component_transfers"),
                None,
                &[
                    ("target_resource", target_resource_uri.to_string()),
                    ("component", archival_object_uri.to_string()),
                ],
            )
            .await?;

        if let Some(event_uri) = response.get("event").and_then(Value::as_str) {
            self.delete_record(event_uri).await?;
        }
        Ok(response)
    }

    /// Reparent an archival object within its resource.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn set_parent(
        &self,
        archival_object_id: u64,
        parent_id: u64,
        position: u32,
    ) -> Result<Value> {
        self.post_record_with_params(
            &self.repo_uri(&format!("/archival_objects/{archival_object_id}/parent")),
            None,
            &[("parent", parent_id.to_string()), ("position", position.to_string())],
        )
        .await
    }
}
