use serde::{Deserialize, Serialize};

/// Identity fields returned by a directory search.
///
/// Every field is required; a raw record missing any of them is dropped
/// from the result set during validation instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPerson {
    /// Opaque handle for follow-up detail lookups.
    pub ldapkey: String,
    /// Surname.
    pub sn: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    /// Stable university-wide id, also the canonical scholars id.
    pub duid: String,
    pub netid: String,
    pub display_name: String,
}

/// Full directory record from a detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedPerson {
    pub ldapkey: String,
    pub sn: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    pub duid: String,
    pub netid: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_office_box: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Directory search outcome.
///
/// Upstream failures are folded into the `error` field rather than raised,
/// so callers can tell "zero matches" (empty results, no error) from
/// "upstream failure" (empty results, error set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<DirectoryPerson>,
    pub count: usize,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Builds a successful response over validated results.
    pub fn ok(query: impl Into<String>, results: Vec<DirectoryPerson>) -> Self {
        Self {
            count: results.len(),
            results,
            query: query.into(),
            error: None,
        }
    }

    /// Builds an error-tagged response with an empty result list.
    pub fn error(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            count: 0,
            query: query.into(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Detail lookup outcome, same error-field contract as [`SearchResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetailsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<DetailedPerson>,
    pub ldapkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PersonDetailsResponse {
    pub fn ok(ldapkey: impl Into<String>, person: DetailedPerson) -> Self {
        Self {
            person: Some(person),
            ldapkey: ldapkey.into(),
            error: None,
        }
    }

    pub fn error(ldapkey: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            person: None,
            ldapkey: ldapkey.into(),
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
    use serde_json::json;

    #[test]
    fn test_directory_person_requires_identity_fields() {
        let complete = json!({
            "ldapkey": "1234",
            "sn": "Smith",
            "givenName": "Jane",
            "duid": "0123456",
            "netid": "js123",
            "display_name": "Jane Smith"
        });
        assert!(serde_json::from_value::<DirectoryPerson>(complete).is_ok());

        let missing_netid = json!({
            "ldapkey": "1234",
            "sn": "Smith",
            "givenName": "Jane",
            "duid": "0123456",
            "display_name": "Jane Smith"
        });
        assert!(serde_json::from_value::<DirectoryPerson>(missing_netid).is_err());
    }

    #[test]
    fn test_directory_person_ignores_unknown_fields() {
        let raw = json!({
            "ldapkey": "1234",
            "sn": "Smith",
            "givenName": "Jane",
            "duid": "0123456",
            "netid": "js123",
            "display_name": "Jane Smith",
            "url": "https://directory.example/jane"
        });
        let person: DirectoryPerson = serde_json::from_value(raw).unwrap();
        assert_eq!(person.given_name, "Jane");
    }

    #[test]
    fn test_search_response_constructors() {
        let response = SearchResponse::ok("Smith", Vec::new());
        assert_eq!(response.count, 0);
        assert!(!response.is_error());

        let response = SearchResponse::error("Smith", "upstream returned status 502");
        assert!(response.is_error());
        assert!(response.results.is_empty());
        assert_eq!(response.query, "Smith");
    }

    #[test]
    fn test_error_field_is_omitted_when_absent() {
        let serialized =
            serde_json::to_value(SearchResponse::ok("Smith", Vec::new())).unwrap();
        assert!(serialized.get("error").is_none());

        let serialized =
            serde_json::to_value(SearchResponse::error("Smith", "boom")).unwrap();
        assert_eq!(serialized["error"], json!("boom"));
    }
}
