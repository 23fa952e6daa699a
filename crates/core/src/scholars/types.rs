use serde::{Deserialize, Serialize};

/// Flat projection of one publication from the scholars profile feed.
///
/// Missing upstream fields degrade to empty strings rather than failing
/// the record; the feed's attribute bags are too irregular to require
/// anything beyond the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub year: String,
    pub citation: String,
    pub url: String,
    pub publication_type: String,
}

/// Flat projection of one grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub title: String,
    pub awarded_by: String,
    pub role: String,
    /// Human-readable "Month D, YYYY" form, or the raw upstream string
    /// when it did not parse.
    pub start_date: String,
    pub end_date: String,
    pub administered_by: String,
}

/// One education record on a scholar profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub description: String,
}

/// Denormalized scholar profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarDetails {
    pub duid: String,
    pub name: String,
    pub title: String,
    pub overview: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub office: String,
    pub research_interests: Vec<String>,
    pub education: Vec<Education>,
    pub profile_url: String,
    pub image_url: String,
}

/// Publications lookup outcome; `duid` echoes the canonical id, or the
/// original query when resolution itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationsResponse {
    pub publications: Vec<Publication>,
    pub count: usize,
    pub duid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublicationsResponse {
    pub fn ok(duid: impl Into<String>, publications: Vec<Publication>) -> Self {
        Self {
            count: publications.len(),
            publications,
            duid: duid.into(),
            error: None,
        }
    }

    pub fn error(duid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            publications: Vec::new(),
            count: 0,
            duid: duid.into(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Grants lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantsResponse {
    pub grants: Vec<Grant>,
    pub count: usize,
    pub duid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GrantsResponse {
    pub fn ok(duid: impl Into<String>, grants: Vec<Grant>) -> Self {
        Self {
            count: grants.len(),
            grants,
            duid: duid.into(),
            error: None,
        }
    }

    pub fn error(duid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            grants: Vec::new(),
            count: 0,
            duid: duid.into(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Profile lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarDetailsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholar: Option<ScholarDetails>,
    pub duid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScholarDetailsResponse {
    pub fn ok(duid: impl Into<String>, scholar: ScholarDetails) -> Self {
        Self {
            scholar: Some(scholar),
            duid: duid.into(),
            error: None,
        }
    }

    pub fn error(duid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scholar: None,
            duid: duid.into(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publications_response_counts_results() {
        let response = PublicationsResponse::ok(
            "0123456",
            vec![Publication::default(), Publication::default()],
        );
        assert_eq!(response.count, 2);
        assert!(!response.is_error());
    }

    #[test]
    fn test_error_responses_echo_the_input() {
        let response = PublicationsResponse::error("jdoe", "Could not find a person matching: jdoe");
        assert_eq!(response.duid, "jdoe");
        assert_eq!(response.count, 0);
        assert!(response.is_error());

        let response = ScholarDetailsResponse::error("jdoe", "boom");
        assert!(response.scholar.is_none());
        assert_eq!(response.duid, "jdoe");
    }

    #[test]
    fn test_success_serialization_omits_error() {
        let serialized =
            serde_json::to_value(GrantsResponse::ok("0123456", Vec::new())).unwrap();
        assert!(serialized.get("error").is_none());
        assert_eq!(serialized["duid"], "0123456");
    }
}
