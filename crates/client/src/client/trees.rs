//! Resource trees and instance cleanup

use aspace_domain::types::TreeNode;
use aspace_domain::{AspaceError, Result};
use serde_json::Value;
use tracing::debug;

use super::AspaceClient;

impl AspaceClient {
    /// Fetch the full tree of a resource.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`], plus
    /// [`AspaceError::Internal`] when the tree shape is unexpected.
    pub async fn get_resource_tree(&self, resource_id: u64) -> Result<TreeNode> {
        let raw = self.get_record(&self.repo_uri(&format!("/resources/{resource_id}/tree"))).await?;
        serde_json::from_value(raw)
            .map_err(|e| AspaceError::Internal(format!("unexpected resource tree shape: {e}")))
    }

    /// URIs of every archival object in a resource, in tree order.
    ///
    /// # Errors
    /// Same as [`Self::get_resource_tree`].
    pub async fn get_resource_archival_object_uris(&self, resource_id: u64) -> Result<Vec<String>> {
        Ok(self.get_resource_tree(resource_id).await?.archival_object_uris())
    }

    /// URIs of archival objects in a resource that carry instances,
    /// optionally limited to one instance type.
    ///
    /// # Errors
    /// Same as [`Self::get_resource_tree`].
    pub async fn get_resource_children_with_instances(
        &self,
        resource_id: u64,
        instance_type: Option<&str>,
    ) -> Result<Vec<String>> {
        Ok(self.get_resource_tree(resource_id).await?.children_with_instances(instance_type))
    }

    /// Instance target URIs on one record: digital object refs, or the
    /// top container refs of sub-containers.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn find_instance_uris(
        &self,
        record_uri: &str,
        instance_type: Option<&str>,
    ) -> Result<Vec<String>> {
        let record = self.get_record(record_uri).await?;
        let Some(instances) = record.get("instances").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        let mut uris = Vec::new();
        for instance in instances {
            let kind = instance.get("instance_type").and_then(Value::as_str).unwrap_or_default();
            if instance_type.is_some_and(|wanted| wanted != kind) {
                continue;
            }
            let target = if kind == "digital_object" {
                instance.pointer("/digital_object/ref")
            } else {
                instance.pointer("/sub_container/top_container/ref")
            };
            if let Some(uri) = target.and_then(Value::as_str) {
                uris.push(uri.to_string());
            }
        }
        Ok(uris)
    }

    /// Delete an instance target when this resource is its only user.
    ///
    /// Digital objects are deleted when linked to exactly one instance;
    /// top containers when they belong to exactly one collection. Anything
    /// shared is left alone.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn delete_single_resource_instance(&self, instance_uri: &str) -> Result<bool> {
        let links = if instance_uri.contains("digital_objects") {
            let digital_object = self.get_record(instance_uri).await?;
            digital_object.get("linked_instances").and_then(Value::as_array).map(Vec::len)
        } else if instance_uri.contains("top_containers") {
            let container = self.get_record(instance_uri).await?;
            container.get("collection").and_then(Value::as_array).map(Vec::len)
        } else {
            None
        };

        if links == Some(1) {
            self.delete_record(instance_uri).await?;
            debug!(uri = instance_uri, "deleted single-use instance target");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove every single-use digital object and top container attached
    /// to a resource's archival objects.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn remove_resource_associations(&self, resource_id: u64) -> Result<usize> {
        let children = self.get_resource_children_with_instances(resource_id, None).await?;

        let mut instance_uris = Vec::new();
        for child_uri in children {
            for uri in self.find_instance_uris(&child_uri, None).await? {
                if !instance_uris.contains(&uri) {
                    instance_uris.push(uri);
                }
            }
        }

        let mut deleted = 0;
        for instance_uri in instance_uris {
            if self.delete_single_resource_instance(&instance_uri).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /* ---------------------------------------------------------------- */
    /* Ref-following display helpers                                     */
    /* ---------------------------------------------------------------- */

    /// Joined titles of a record's ancestors, top down.
    ///
    /// Returns an empty string for records without a parent.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn build_hierarchy(&self, record: &Value, delimiter: &str) -> Result<String> {
        let mut titles = Vec::new();
        let mut current = record.clone();
        while let Some(parent_ref) =
            current.pointer("/parent/ref").and_then(Value::as_str).map(ToString::to_string)
        {
            let parent = self.get_record(&parent_ref).await?;
            titles.push(self.display_string(&parent, false).await?);
            current = parent;
        }
        titles.reverse();
        Ok(titles.join(&format!(" {delimiter} ")))
    }

    /// Display string for a record, optionally borrowing the parent's
    /// title when the record has only dates.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`] when a parent fetch is needed.
    pub async fn display_string(&self, record: &Value, add_parent_title: bool) -> Result<String> {
        use aspace_domain::utils::record_format::{format_dates, format_display_string, sanitize_title};

        let has_title = record.get("title").and_then(Value::as_str).is_some();
        if !has_title && add_parent_title {
            // Only date-only records borrow the parent's title; a record
            // with neither would render a dangling comma.
            let dates = format_dates(record);
            if !dates.is_empty() {
                if let Some(parent_ref) = record.pointer("/parent/ref").and_then(Value::as_str) {
                    let parent = self.get_record(parent_ref).await?;
                    let parent_title = parent
                        .get("display_string")
                        .and_then(Value::as_str)
                        .map(sanitize_title)
                        .unwrap_or_default();
                    return Ok(format!("{parent_title}, {dates}"));
                }
            }
        }
        Ok(format_display_string(record).unwrap_or_default())
    }

    /// Walk up the hierarchy until a record with dates is found and render
    /// them.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn most_proximate_date(&self, record: &Value) -> Result<String> {
        use aspace_domain::utils::record_format::format_dates;

        let mut current = record.clone();
        loop {
            let has_dates = current
                .get("dates")
                .and_then(Value::as_array)
                .is_some_and(|dates| !dates.is_empty());
            if has_dates {
                return Ok(format_dates(&current));
            }
            let Some(parent_ref) =
                current.pointer("/parent/ref").and_then(Value::as_str).map(ToString::to_string)
            else {
                return Ok(String::new());
            };
            current = self.get_record(&parent_ref).await?;
        }
    }

    /// Access links of a record's digital object instances, optionally
    /// filtered to links containing `match_pattern`.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn digital_object_instance_links(
        &self,
        record: &Value,
        match_pattern: Option<&str>,
    ) -> Result<Vec<String>> {
        use aspace_domain::utils::record_format::digital_object_link;

        let mut links = Vec::new();
        for uri in instance_refs(record, "digital_object") {
            let digital_object = self.get_record(&uri).await?;
            if let Some(link) = digital_object_link(&digital_object) {
                links.push(link);
            }
        }
        if let Some(pattern) = match_pattern {
            links.retain(|link| link.contains(pattern));
        }
        Ok(links)
    }

}

fn instance_refs(record: &Value, instance_type: &str) -> Vec<String> {
    record
        .get("instances")
        .and_then(Value::as_array)
        .map(|instances| {
            instances
                .iter()
                .filter(|i| i.get("instance_type").and_then(Value::as_str) == Some(instance_type))
                .filter_map(|i| i.pointer("/digital_object/ref").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
