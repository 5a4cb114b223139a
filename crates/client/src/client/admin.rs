//! Enumerations and EAD export

use aspace_domain::{AspaceError, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::AspaceClient;

/// Options for EAD export.
#[derive(Debug, Clone)]
pub struct EadExportOptions {
    /// Include unpublished components in the export.
    pub include_unpublished: bool,
    /// Include digital archival object links.
    pub include_daos: bool,
    /// Number the container elements.
    pub numbered_cs: bool,
}

impl Default for EadExportOptions {
    fn default() -> Self {
        Self { include_unpublished: false, include_daos: true, numbered_cs: true }
    }
}

impl AspaceClient {
    /// Fetch a controlled-value enumeration by id.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn get_enumeration(&self, id: u64) -> Result<Value> {
        self.get_record(&format!("/config/enumerations/{id}")).await
    }

    /// Post an updated enumeration back.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn update_enumeration(&self, id: u64, enumeration: &Value) -> Result<Value> {
        self.post_record(&format!("/config/enumerations/{id}"), Some(enumeration)).await
    }

    /// Append values to an enumeration, skipping values it already has.
    ///
    /// Returns the values actually added.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn add_enumeration_values(
        &self,
        id: u64,
        new_values: &[&str],
    ) -> Result<Vec<String>> {
        let mut enumeration = self.get_enumeration(id).await?;

        let existing: Vec<String> = enumeration
            .get("values")
            .and_then(Value::as_array)
            .map(|values| {
                values.iter().filter_map(Value::as_str).map(ToString::to_string).collect()
            })
            .unwrap_or_default();

        let to_add: Vec<String> = new_values
            .iter()
            .filter(|v| !existing.iter().any(|e| e == *v))
            .map(ToString::to_string)
            .collect();

        if !to_add.is_empty() {
            if let Some(values) = enumeration.get_mut("values").and_then(Value::as_array_mut) {
                values.extend(to_add.iter().cloned().map(Value::String));
            }
            self.update_enumeration(id, &enumeration).await?;
            info!(enumeration = id, added = to_add.len(), "extended enumeration");
        }
        Ok(to_add)
    }

    /// Export a resource as EAD XML.
    ///
    /// # Errors
    /// Status mapping as in [`Self::get_record`]; the body is returned
    /// verbatim, not parsed.
    pub async fn export_ead(
        &self,
        resource_id: u64,
        options: &EadExportOptions,
    ) -> Result<String> {
        let uri = self.repo_uri(&format!("/resource_descriptions/{resource_id}.xml"));
        let params = [
            ("include_unpublished", options.include_unpublished.to_string()),
            ("include_daos", options.include_daos.to_string()),
            ("numbered_cs", options.numbered_cs.to_string()),
        ];
        let body = self.request_text(Method::GET, &uri, &params, None).await?;
        if body.trim().is_empty() {
            return Err(AspaceError::Internal(format!(
                "EAD export for resource {resource_id} returned an empty document"
            )));
        }
        Ok(body)
    }
}
