//! Formatting helpers for ArchivesSpace records
//!
//! These functions read the JSON shapes ArchivesSpace returns and produce
//! the display strings archivists expect: `title, dates` with bulk dates in
//! parentheses, extents joined with semicolons, note text pulled out of
//! single- or multi-part notes. They never perform I/O; the client crate
//! layers ref-following variants on top where a parent record is needed.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static MARKUP_TAGS: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"<.*?>").expect("markup regex is valid")
});

static LEADING_NUMERIC_ID: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[\d.]+").expect("collection id regex is valid")
});

static RESTRICTION_DATE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"<date[^>]*\bnormal="([^"]+)""#).expect("restriction date regex is valid")
});

/// Strip EAD markup tags from a title and trim surrounding whitespace.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    MARKUP_TAGS.replace_all(title, "").trim().to_string()
}

/// Render a record's dates the way the staff interface does.
///
/// Inclusive dates are joined with commas; the first bulk date is appended
/// as `(bulk ...)`. Dates without an `expression` fall back to
/// `begin`-`end`. Records without dates yield an empty string.
#[must_use]
pub fn format_dates(record: &Value) -> String {
    let Some(dates) = record.get("dates").and_then(Value::as_array) else {
        return String::new();
    };

    let mut inclusive = Vec::new();
    let mut bulk = Vec::new();
    for date in dates {
        let mut expression =
            date.get("expression").and_then(Value::as_str).unwrap_or_default().to_string();
        if expression.is_empty() {
            let begin = date.get("begin").and_then(Value::as_str).unwrap_or_default();
            let end = date.get("end").and_then(Value::as_str).unwrap_or_default();
            expression = match (begin.is_empty(), end.is_empty()) {
                (false, false) => format!("{begin}-{end}"),
                (false, true) => begin.to_string(),
                _ => String::new(),
            };
        }
        match date.get("date_type").and_then(Value::as_str) {
            Some("inclusive") => inclusive.push(expression.trim().to_string()),
            Some("bulk") => bulk.push(expression.trim().to_string()),
            _ => {}
        }
    }

    let mut rendered = inclusive.join(", ");
    if let Some(first_bulk) = bulk.first() {
        rendered.push_str(&format!(" (bulk {first_bulk})"));
    }
    rendered
}

/// Build a `title, dates` display string from a record's own fields.
///
/// Returns `None` when the record has neither a title nor dates; for
/// date-only records the caller may want the parent's title, which is a
/// client-side concern (it needs another API call).
#[must_use]
pub fn format_display_string(record: &Value) -> Option<String> {
    let title = record.get("title").and_then(Value::as_str).map(sanitize_title);
    let dates = format_dates(record);

    match (title, dates.is_empty()) {
        (Some(title), false) => Some(format!("{title}, {dates}")),
        (Some(title), true) => Some(title),
        (None, false) => Some(dates),
        (None, true) => None,
    }
}

/// All notes on a record with the given `type`.
#[must_use]
pub fn notes_by_type<'a>(record: &'a Value, note_type: &str) -> Vec<&'a Value> {
    record
        .get("notes")
        .and_then(Value::as_array)
        .map(|notes| {
            notes
                .iter()
                .filter(|note| note.get("type").and_then(Value::as_str) == Some(note_type))
                .collect()
        })
        .unwrap_or_default()
}

/// Text content of a note: `content[0]` for single-part notes, the first
/// subnote's content otherwise.
#[must_use]
pub fn note_text(note: &Value) -> Option<String> {
    if note.get("jsonmodel_type").and_then(Value::as_str) == Some("note_singlepart") {
        note.get("content")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(Value::as_str)
            .map(ToString::to_string)
    } else {
        note.get("subnotes")
            .and_then(Value::as_array)
            .and_then(|s| s.first())
            .and_then(|subnote| subnote.get("content"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }
}

/// Text of the first note with the given type, or `None`.
#[must_use]
pub fn first_note_by_type(record: &Value, note_type: &str) -> Option<String> {
    notes_by_type(record, note_type).first().and_then(|note| note_text(note))
}

/// Render a record's extents as `number type (summary; details; dimensions)`
/// fragments joined with semicolons.
#[must_use]
pub fn parse_extents(record: &Value) -> String {
    let Some(extents) = record.get("extents").and_then(Value::as_array) else {
        return String::new();
    };

    let mut rendered = Vec::new();
    for extent in extents {
        let number = extent.get("number").and_then(Value::as_str).unwrap_or_default();
        let extent_type = extent.get("extent_type").and_then(Value::as_str).unwrap_or_default();
        let mut parsed = format!("{number} {extent_type}");

        let parenthetical: Vec<&str> = ["container_summary", "physical_details", "dimensions"]
            .iter()
            .filter_map(|key| extent.get(*key).and_then(Value::as_str))
            .filter(|v| !v.is_empty())
            .collect();
        if !parenthetical.is_empty() {
            parsed = format!("{parsed} ({})", parenthetical.join("; "));
        }
        rendered.push(parsed);
    }
    rendered.join("; ")
}

/// Ensure a subject or agent heading ends with terminal punctuation.
#[must_use]
pub fn ensure_terminal_punctuation(heading: &str) -> String {
    if heading.ends_with('.') || heading.ends_with(')') || heading.ends_with('-') {
        heading.to_string()
    } else {
        format!("{heading}.")
    }
}

/// Derive the collection id from a resource record.
///
/// Prefers the tail of the EAD id (everything after the institution
/// segments), falling back to a leading numeric identifier in `id_0`.
#[must_use]
pub fn collection_id(resource: &Value) -> String {
    if let Some(ead_id) = resource.get("ead_id").and_then(Value::as_str) {
        if !ead_id.is_empty() {
            let parts: Vec<&str> = ead_id.split('-').collect();
            if parts.len() > 2 {
                return parts[2..].join("-");
            }
        }
    }
    let identifier = resource.get("id_0").and_then(Value::as_str).unwrap_or_default().trim();
    LEADING_NUMERIC_ID.find(identifier).map(|m| m.as_str().to_string()).unwrap_or_default()
}

/// Access link for a digital object: the first file version's URI, or the
/// digital object id when no file version exists.
#[must_use]
pub fn digital_object_link(digital_object: &Value) -> Option<String> {
    let file_uri = digital_object
        .get("file_versions")
        .and_then(Value::as_array)
        .and_then(|versions| versions.first())
        .and_then(|version| version.get("file_uri"))
        .and_then(Value::as_str);
    match file_uri {
        Some(uri) => Some(uri.to_string()),
        None => digital_object
            .get("digital_object_id")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

/// Local classification codes stored in the user-defined enum fields.
#[must_use]
pub fn user_defined_classifications(record: &Value) -> Vec<String> {
    let Some(user_defined) = record.get("user_defined") else {
        return Vec::new();
    };
    ["enum_1", "enum_2", "enum_3"]
        .iter()
        .filter_map(|field| user_defined.get(*field).and_then(Value::as_str))
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// URIs of agents linked to a record with the given role.
#[must_use]
pub fn agents_by_role(record: &Value, role: &str) -> Vec<String> {
    record
        .get("linked_agents")
        .and_then(Value::as_array)
        .map(|agents| {
            agents
                .iter()
                .filter(|a| a.get("role").and_then(Value::as_str) == Some(role))
                .filter_map(|a| a.get("ref").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// The `normal` attribute of the first `<date>` tag in restriction text.
#[must_use]
pub fn restriction_end_date(restriction_text: &str) -> Option<String> {
    RESTRICTION_DATE
        .captures(restriction_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether restriction text carries a machine-readable end date before
/// `today`.
///
/// ArchivesSpace normal dates are ISO-formatted, so string comparison
/// orders them correctly even when only a year is given.
#[must_use]
pub fn restriction_expired(restriction_text: &str, today: NaiveDate) -> bool {
    restriction_end_date(restriction_text)
        .is_some_and(|normal| normal < today.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_markup_from_titles() {
        assert_eq!(sanitize_title("Papers of <emph>John Doe</emph> "), "Papers of John Doe");
        assert_eq!(sanitize_title("Plain title"), "Plain title");
    }

    #[test]
    fn formats_inclusive_and_bulk_dates() {
        let record = json!({"dates": [
            {"date_type": "inclusive", "expression": "1900-1950"},
            {"date_type": "inclusive", "expression": "1960"},
            {"date_type": "bulk", "expression": "1920-1930"},
        ]});
        assert_eq!(format_dates(&record), "1900-1950, 1960 (bulk 1920-1930)");
    }

    #[test]
    fn builds_date_expression_from_begin_and_end() {
        let record = json!({"dates": [
            {"date_type": "inclusive", "begin": "1900", "end": "1950"},
            {"date_type": "inclusive", "begin": "1960"},
        ]});
        assert_eq!(format_dates(&record), "1900-1950, 1960");
    }

    #[test]
    fn display_string_combines_title_and_dates() {
        let record = json!({
            "title": "Correspondence",
            "dates": [{"date_type": "inclusive", "expression": "1900-1950"}],
        });
        assert_eq!(format_display_string(&record).as_deref(), Some("Correspondence, 1900-1950"));

        let title_only = json!({"title": "Correspondence"});
        assert_eq!(format_display_string(&title_only).as_deref(), Some("Correspondence"));

        let dates_only = json!({"dates": [{"date_type": "inclusive", "expression": "1900"}]});
        assert_eq!(format_display_string(&dates_only).as_deref(), Some("1900"));

        assert_eq!(format_display_string(&json!({})), None);
    }

    #[test]
    fn extracts_note_text_for_both_note_shapes() {
        let singlepart = json!({
            "jsonmodel_type": "note_singlepart",
            "content": ["Abstract text"],
        });
        assert_eq!(note_text(&singlepart).as_deref(), Some("Abstract text"));

        let multipart = json!({
            "jsonmodel_type": "note_multipart",
            "subnotes": [{"content": "Restricted until 2030"}],
        });
        assert_eq!(note_text(&multipart).as_deref(), Some("Restricted until 2030"));
    }

    #[test]
    fn finds_first_note_by_type() {
        let record = json!({"notes": [
            {"type": "scopecontent", "jsonmodel_type": "note_multipart",
             "subnotes": [{"content": "Scope"}]},
            {"type": "accessrestrict", "jsonmodel_type": "note_multipart",
             "subnotes": [{"content": "Closed"}]},
        ]});
        assert_eq!(first_note_by_type(&record, "accessrestrict").as_deref(), Some("Closed"));
        assert_eq!(first_note_by_type(&record, "bioghist"), None);
        assert_eq!(notes_by_type(&record, "scopecontent").len(), 1);
    }

    #[test]
    fn renders_extents_with_parentheticals() {
        let record = json!({"extents": [
            {"number": "2", "extent_type": "linear feet",
             "container_summary": "2 boxes", "dimensions": "12x10"},
            {"number": "1", "extent_type": "oversize folder"},
        ]});
        assert_eq!(
            parse_extents(&record),
            "2 linear feet (2 boxes; 12x10); 1 oversize folder"
        );
        assert_eq!(parse_extents(&json!({})), "");
    }

    #[test]
    fn punctuation_is_added_only_when_needed() {
        assert_eq!(ensure_terminal_punctuation("Doe, John"), "Doe, John.");
        assert_eq!(ensure_terminal_punctuation("Doe, John."), "Doe, John.");
        assert_eq!(ensure_terminal_punctuation("Michigan (State)"), "Michigan (State)");
    }

    #[test]
    fn collection_id_prefers_ead_id() {
        let record = json!({"ead_id": "umich-bhl-851234", "id_0": "851234 Aa 2"});
        assert_eq!(collection_id(&record), "851234");

        let with_suffix = json!({"ead_id": "umich-bhl-0144-2"});
        assert_eq!(collection_id(&with_suffix), "0144-2");

        let numeric_only = json!({"id_0": "92.114 Bimu"});
        assert_eq!(collection_id(&numeric_only), "92.114");

        assert_eq!(collection_id(&json!({"id_0": "Vault"})), "");
    }

    #[test]
    fn digital_object_link_prefers_file_version() {
        let with_file = json!({
            "digital_object_id": "abc",
            "file_versions": [{"file_uri": "https://files.example/1.pdf"}],
        });
        assert_eq!(digital_object_link(&with_file).as_deref(), Some("https://files.example/1.pdf"));

        let without_file = json!({"digital_object_id": "abc"});
        assert_eq!(digital_object_link(&without_file).as_deref(), Some("abc"));
    }

    #[test]
    fn reads_user_defined_classifications() {
        let record = json!({"user_defined": {"enum_1": "MR", "enum_3": "HS"}});
        assert_eq!(user_defined_classifications(&record), vec!["MR", "HS"]);
        assert!(user_defined_classifications(&json!({})).is_empty());
    }

    #[test]
    fn selects_agents_by_role() {
        let record = json!({"linked_agents": [
            {"role": "creator", "ref": "/agents/people/1"},
            {"role": "source", "ref": "/agents/corporate_entities/2"},
            {"role": "creator", "ref": "/agents/families/3"},
        ]});
        assert_eq!(
            agents_by_role(&record, "creator"),
            vec!["/agents/people/1", "/agents/families/3"]
        );
        assert!(agents_by_role(&record, "subject").is_empty());
        assert!(agents_by_role(&json!({}), "creator").is_empty());
    }

    #[test]
    fn detects_expired_restrictions() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let expired = r#"Closed until <date type="expiration" normal="2020-01-01">January 2020</date>."#;
        let active = r#"Closed until <date normal="2099-12-31">2099</date>."#;
        let undated = "Closed indefinitely.";

        assert_eq!(restriction_end_date(expired).as_deref(), Some("2020-01-01"));
        assert!(restriction_expired(expired, today));
        assert!(!restriction_expired(active, today));
        assert!(!restriction_expired(undated, today));
    }

    #[test]
    fn year_only_normal_dates_compare_correctly() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert!(restriction_expired(r#"<date normal="1990">1990</date>"#, today));
        assert!(!restriction_expired(r#"<date normal="2099">2099</date>"#, today));
    }
}
