//! Agent and subject heading helpers
//!
//! Linked agents and subjects are stored as refs; these helpers fetch the
//! referenced records and render library-style headings with terminal
//! punctuation.

use aspace_domain::utils::record_format::{agents_by_role, ensure_terminal_punctuation};
use aspace_domain::Result;
use serde_json::Value;

use super::AspaceClient;

impl AspaceClient {
    /// Heading of the first agent with the given role, or an empty string.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn first_agent_by_role(&self, record: &Value, role: &str) -> Result<String> {
        let Some(agent_uri) = agents_by_role(record, role).into_iter().next() else {
            return Ok(String::new());
        };
        let agent = self.get_agent(&agent_uri).await?;
        let title = agent.get("title").and_then(Value::as_str).unwrap_or_default();
        Ok(ensure_terminal_punctuation(title))
    }

    /// Source heading of an accession.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn accession_source(&self, accession: &Value) -> Result<String> {
        self.first_agent_by_role(accession, "source").await
    }

    /// Creator heading of a resource.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn resource_creator(&self, resource: &Value) -> Result<String> {
        self.first_agent_by_role(resource, "creator").await
    }

    /// Headings for every agent linked to a record, with subdivision terms
    /// appended `-- like this`.
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn linked_agent_names(&self, record: &Value) -> Result<Vec<String>> {
        let Some(linked) = record.get("linked_agents").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for linked_agent in linked {
            names.push(self.agent_heading(linked_agent).await?);
        }
        Ok(names)
    }

    async fn agent_heading(&self, linked_agent: &Value) -> Result<String> {
        let agent_uri = linked_agent.get("ref").and_then(Value::as_str).unwrap_or_default();
        let agent = self.get_agent(agent_uri).await?;
        let mut name =
            agent.get("title").and_then(Value::as_str).unwrap_or_default().to_string();

        let terms: Vec<&str> = linked_agent
            .get("terms")
            .and_then(Value::as_array)
            .map(|terms| {
                terms.iter().filter_map(|t| t.get("term").and_then(Value::as_str)).collect()
            })
            .unwrap_or_default();
        if !terms.is_empty() {
            name = name.trim_end_matches('.').to_string();
            let mut parts = vec![name];
            parts.extend(terms.into_iter().map(ToString::to_string));
            name = parts.join(" -- ");
        }
        Ok(ensure_terminal_punctuation(&name))
    }

    /// Headings for every subject linked to a record, skipping the given
    /// term types (e.g. `genre_form`).
    ///
    /// # Errors
    /// Same mapping as [`Self::get_record`].
    pub async fn linked_subject_names(
        &self,
        record: &Value,
        ignore_term_types: &[&str],
    ) -> Result<Vec<String>> {
        let subject_uris: Vec<String> = record
            .get("subjects")
            .and_then(Value::as_array)
            .map(|subjects| {
                subjects
                    .iter()
                    .filter_map(|s| s.get("ref").and_then(Value::as_str))
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut headings = Vec::new();
        for subject_uri in subject_uris {
            let subject = self.get_record(&subject_uri).await?;
            let term_type = subject
                .pointer("/terms/0/term_type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if ignore_term_types.contains(&term_type) {
                continue;
            }
            let title = subject.get("title").and_then(Value::as_str).unwrap_or_default();
            headings.push(ensure_terminal_punctuation(title));
        }
        Ok(headings)
    }
}
