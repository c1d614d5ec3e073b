//! Tracker (Jira REST v2) wire format and search client.
//!
//! Only the fields the pipeline consumes are modeled; everything else in a
//! search response is ignored during deserialization. Optional fields carry
//! display defaults ("Unassigned", "None") via the accessor methods so the
//! classifier never deals with `Option` at the presentation layer.

pub mod client;

pub use client::JiraClient;

use serde::Deserialize;

/// Response from GET /rest/api/2/search
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Matching issues, newest-updated first as requested by the JQL
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A single tracker issue with its expanded change history
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Unique issue key, e.g. "OCM-1234"
    pub key: String,
    /// Nested field payload
    pub fields: Fields,
    /// Change history; present only when the search expands the changelog
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

/// The `fields` object of an issue
#[derive(Debug, Clone, Deserialize)]
pub struct Fields {
    pub summary: String,
    pub status: Status,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub issuetype: IssueType,
    #[serde(default)]
    pub description: Option<String>,
}

/// Current workflow status
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub name: String,
}

/// Assigned person
#[derive(Debug, Clone, Deserialize)]
pub struct Assignee {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Priority name, e.g. "Blocker"
#[derive(Debug, Clone, Deserialize)]
pub struct Priority {
    pub name: String,
}

/// Issue type name, e.g. "Bug"
#[derive(Debug, Clone, Deserialize)]
pub struct IssueType {
    pub name: String,
}

/// Expanded change history
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

/// One recorded change event; order within the response is not guaranteed
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    /// Tracker timestamp, e.g. `2024-01-15T10:30:45.123+0000`
    pub created: String,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

/// One field change inside a history entry
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    pub field: String,
    #[serde(rename = "fromString")]
    pub from_string: Option<String>,
    #[serde(rename = "toString")]
    pub to_string: Option<String>,
}

impl Issue {
    /// Assignee display name, "Unassigned" when the field is null
    pub fn assignee_name(&self) -> &str {
        self.fields
            .assignee
            .as_ref()
            .map(|a| a.display_name.as_str())
            .unwrap_or("Unassigned")
    }

    /// Priority name, "None" when the field is null
    pub fn priority_name(&self) -> &str {
        self.fields
            .priority
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("None")
    }

    /// Free-text description, empty when absent
    pub fn description(&self) -> &str {
        self.fields.description.as_deref().unwrap_or("")
    }

    /// History entries, empty when the changelog was not expanded
    pub fn histories(&self) -> &[History] {
        self.changelog
            .as_ref()
            .map(|c| c.histories.as_slice())
            .unwrap_or(&[])
    }
}
