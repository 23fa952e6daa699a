use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::types::{Event, SimplifiedEvent};

/// Maximum description length in the simplified projection.
pub const DESCRIPTION_LIMIT: usize = 200;

/// Parses the calendar date out of a feed timestamp.
///
/// The feed mostly emits RFC 3339 (`2025-04-05T10:00:00Z`), but records
/// without an offset or with a bare date show up too. Returns `None` for
/// anything unparseable; the caller logs and skips the record.
pub fn parse_start_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.date());
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").ok()
}

/// Truncates a description to [`DESCRIPTION_LIMIT`] characters, appending
/// an ellipsis when anything was cut.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_LIMIT {
        return description.to_string();
    }
    let truncated: String = description.chars().take(DESCRIPTION_LIMIT).collect();
    format!("{truncated}...")
}

/// Projects a full event into the simplified analysis view.
pub fn simplify(event: &Event, local_id: u32) -> SimplifiedEvent {
    SimplifiedEvent {
        local_id,
        title: event.summary.clone(),
        groups: event.sponsor.clone(),
        categories: event.categories.clone(),
        description: event.description.as_deref().map(truncate_description),
        start_time: event.start_timestamp.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(raw: serde_json::Value) -> Event {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_parse_start_date_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();
        assert_eq!(parse_start_date("2025-04-05T10:00:00Z"), Some(expected));
        assert_eq!(
            parse_start_date("2025-04-05T10:00:00-04:00"),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_start_date_without_offset() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();
        assert_eq!(parse_start_date("2025-04-05T10:00:00"), Some(expected));
        assert_eq!(parse_start_date("2025-04-05"), Some(expected));
    }

    #[test]
    fn test_parse_start_date_rejects_garbage() {
        assert_eq!(parse_start_date(""), None);
        assert_eq!(parse_start_date("not a date"), None);
        assert_eq!(parse_start_date("2025-13-40T10:00:00Z"), None);
    }

    #[test]
    fn test_truncate_description_short_text_unchanged() {
        assert_eq!(truncate_description("short"), "short");

        let exactly_limit = "x".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&exactly_limit), exactly_limit);
    }

    #[test]
    fn test_truncate_description_long_text_gets_ellipsis() {
        let long = "x".repeat(DESCRIPTION_LIMIT + 50);
        let truncated = truncate_description(&long);

        assert_eq!(truncated.chars().count(), DESCRIPTION_LIMIT + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_description_counts_chars_not_bytes() {
        let long = "é".repeat(DESCRIPTION_LIMIT + 1);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.chars().count(), DESCRIPTION_LIMIT + 3);
    }

    #[test]
    fn test_simplify_projects_essentials() {
        let event = event(json!({
            "id": "CAL-1",
            "start_timestamp": "2025-04-05T10:00:00Z",
            "summary": "Talk A",
            "sponsor": "Music Department",
            "categories": ["Arts", "Lecture"],
            "description": "An afternoon talk."
        }));

        let simplified = simplify(&event, 7);
        assert_eq!(simplified.local_id, 7);
        assert_eq!(simplified.title.as_deref(), Some("Talk A"));
        assert_eq!(simplified.groups.as_deref(), Some("Music Department"));
        assert_eq!(
            simplified.categories,
            Some(vec!["Arts".to_string(), "Lecture".to_string()])
        );
        assert_eq!(simplified.description.as_deref(), Some("An afternoon talk."));
        assert_eq!(simplified.start_time, "2025-04-05T10:00:00Z");
    }

    #[test]
    fn test_simplify_truncates_long_descriptions() {
        let event = event(json!({
            "id": "CAL-2",
            "start_timestamp": "2025-04-05T10:00:00Z",
            "description": "d".repeat(DESCRIPTION_LIMIT + 1)
        }));

        let simplified = simplify(&event, 1);
        assert!(simplified.description.unwrap().ends_with("..."));
    }
}
