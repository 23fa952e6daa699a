//! Projection of the scholars upstream's nested attribute-bag JSON into
//! the flat record types.
//!
//! The upstream schema is deep and irregular. A missing or mistyped
//! field degrades to an empty string (or empty list) instead of failing
//! the record.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::types::{Education, Grant, Publication, ScholarDetails};

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup tag pattern is valid"));

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// String at `item.attributes.<key>`, or empty.
fn attr_str(item: &Value, key: &str) -> String {
    item.get("attributes")
        .and_then(|attributes| attributes.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// String at `item.<key>`, or empty.
fn top_str(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Walks a path of object keys, returning the string at the end or empty.
fn nested_str(value: &Value, path: &[&str]) -> String {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    current.as_str().unwrap_or_default().to_string()
}

/// Splits the semicolon-delimited author list into individual names.
fn extract_authors(item: &Value) -> Vec<String> {
    let author_list = attr_str(item, "authorList");
    author_list
        .split(';')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_string)
        .collect()
}

/// Publication year, taking the part before the first hyphen when the
/// upstream sends a full ISO date.
fn extract_year(item: &Value) -> String {
    let year = attr_str(item, "year");
    year.split('-').next().unwrap_or_default().to_string()
}

/// Preferred citation text: APA, then Chicago, then MLA, with embedded
/// markup tags stripped.
fn extract_citation(item: &Value) -> String {
    for key in ["apaCitation", "chicagoCitation", "mlaCitation"] {
        let citation = attr_str(item, key);
        if !citation.is_empty() {
            return MARKUP_TAG.replace_all(&citation, "").into_owned();
        }
    }
    String::new()
}

/// Publication type is the last path segment of the type URI.
fn extract_publication_type(item: &Value) -> String {
    top_str(item, "vivoType")
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Reformats an upstream `YYYY-MM-DD` date (optionally with a time
/// component, which is discarded) into "Month D, YYYY". Unparseable
/// input is passed through verbatim, minus the time component.
fn format_grant_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let date_part = raw.split('T').next().unwrap_or(raw);
    let mut pieces = date_part.splitn(3, '-');
    if let (Some(year), Some(month), Some(day)) = (pieces.next(), pieces.next(), pieces.next()) {
        if let (Ok(month), Ok(day)) = (month.parse::<usize>(), day.parse::<u32>()) {
            if (1..=12).contains(&month) {
                return format!("{} {}, {}", MONTHS[month - 1], day, year);
            }
        }
    }
    date_part.to_string()
}

/// Year portion of an upstream date string, or the string itself when it
/// has no date shape.
fn year_from_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let date_part = raw.split('T').next().unwrap_or(raw);
    date_part.split('-').next().unwrap_or(date_part).to_string()
}

/// First department label on a profile.
fn extract_department(item: &Value) -> String {
    item.get("departments")
        .and_then(Value::as_array)
        .and_then(|departments| departments.first())
        .map(|department| top_str(department, "label"))
        .unwrap_or_default()
}

/// Office location from the attributes, falling back to the work-location
/// address record.
fn extract_office(item: &Value) -> String {
    let office = attr_str(item, "officeLocation");
    if !office.is_empty() {
        return office;
    }
    item.get("addresses")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|address| top_str(address, "uri").contains("work_location"))
        .map(|address| top_str(address, "label"))
        .unwrap_or_default()
}

fn extract_research_interests(item: &Value) -> Vec<String> {
    item.get("researchAreas")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|area| top_str(area, "label"))
        .filter(|label| !label.is_empty())
        .collect()
}

fn extract_education(item: &Value) -> Vec<Education> {
    item.get("educations")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|education| {
            let degree = attr_str(education, "degree");
            let institution = nested_str(education, &["attributes", "institution", "label"]);
            let year = year_from_date(&attr_str(education, "endDate"));
            let description = if year.is_empty() {
                format!("{degree} {institution}")
            } else {
                format!("{degree} {institution} ({year})")
            };
            Education {
                degree,
                institution,
                year,
                description,
            }
        })
        .collect()
}

/// Projects one publication item.
pub fn publication_from_item(item: &Value) -> Publication {
    Publication {
        title: top_str(item, "label"),
        authors: extract_authors(item),
        journal: attr_str(item, "publishedIn"),
        year: extract_year(item),
        citation: extract_citation(item),
        url: top_str(item, "uri"),
        publication_type: extract_publication_type(item),
    }
}

/// Projects one grant item.
pub fn grant_from_item(item: &Value) -> Grant {
    Grant {
        title: top_str(item, "label"),
        awarded_by: attr_str(item, "awardedBy"),
        role: attr_str(item, "roleName"),
        start_date: format_grant_date(&attr_str(item, "startDate")),
        end_date: format_grant_date(&attr_str(item, "endDate")),
        administered_by: attr_str(item, "administeredBy"),
    }
}

/// Projects a complete-profile item into [`ScholarDetails`].
pub fn scholar_from_item(duid: &str, item: &Value) -> ScholarDetails {
    ScholarDetails {
        duid: duid.to_string(),
        name: attr_str(item, "name"),
        title: attr_str(item, "preferredTitle"),
        overview: attr_str(item, "overview"),
        department: extract_department(item),
        email: attr_str(item, "primaryEmail"),
        phone: attr_str(item, "phone"),
        office: extract_office(item),
        research_interests: extract_research_interests(item),
        education: extract_education(item),
        profile_url: top_str(item, "uri"),
        image_url: attr_str(item, "imageUri"),
    }
}
