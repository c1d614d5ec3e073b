//! End-to-end pipeline test: parse a search response fixture, classify the
//! transitions, and compose a report through a mock generation client.

use chrono::{NaiveDate, NaiveDateTime};
use statusbrief_core::jira::SearchResponse;
use statusbrief_core::report::{self, GenerationClient, NO_DATA_MESSAGE};
use statusbrief_core::transitions;
use statusbrief_core::Result;

const FIXTURE: &str = r#"{
    "issues": [
        {
            "key": "OCM-200",
            "fields": {
                "summary": "Add regional failover toggle",
                "status": {"name": "In Progress"},
                "assignee": {"displayName": "Priya Shah"},
                "priority": {"name": "Major"},
                "issuetype": {"name": "Story"},
                "description": "Expose the failover toggle in the API"
            },
            "changelog": {
                "histories": [
                    {
                        "created": "2024-01-12T14:05:00.000+0000",
                        "items": [
                            {"field": "status", "fromString": "To Do", "toString": "In Progress"}
                        ]
                    }
                ]
            }
        },
        {
            "key": "OCM-201",
            "fields": {
                "summary": "Upgrade node pool defaults",
                "status": {"name": "Closed"},
                "assignee": {"displayName": "Marco Diaz"},
                "priority": {"name": "Minor"},
                "issuetype": {"name": "Task"},
                "description": "Bump the default instance type"
            },
            "changelog": {
                "histories": [
                    {
                        "created": "2024-01-13T10:00:00.000+0000",
                        "items": [
                            {"field": "status", "fromString": "Code Review", "toString": "Closed"}
                        ]
                    },
                    {
                        "created": "2023-12-01T10:00:00.000+0000",
                        "items": [
                            {"field": "status", "fromString": "To Do", "toString": "In Progress"}
                        ]
                    }
                ]
            }
        },
        {
            "key": "OCM-202",
            "fields": {
                "summary": "Quota sync stuck behind vendor ticket",
                "status": {"name": "Blocked - External"},
                "assignee": null,
                "priority": {"name": "Blocker"},
                "issuetype": {"name": "Bug"},
                "description": null
            }
        }
    ]
}"#;

struct CannedClient {
    narrative: &'static str,
}

impl GenerationClient for CannedClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        // The prompt must carry the classified data
        assert!(prompt.contains("OCM-200"));
        assert!(prompt.contains("OCM-201"));
        assert!(prompt.contains("BLOCKED ITEMS:"));
        Ok(self.narrative.to_string())
    }
}

fn cutoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn fixture_flows_from_wire_to_report() {
    let response: SearchResponse = serde_json::from_str(FIXTURE).unwrap();
    let buckets = transitions::classify_at(&response.issues, cutoff());

    // OCM-200 started inside the window
    assert_eq!(buckets.started.len(), 1);
    assert_eq!(buckets.started[0].key, "OCM-200");

    // OCM-201 closed inside the window; its December start is outside
    assert_eq!(buckets.closed.len(), 1);
    assert_eq!(buckets.closed[0].key, "OCM-201");

    // OCM-202 is blocked twice over (status substring and Blocker priority)
    // but appears once, with the unassigned default
    assert_eq!(buckets.blocked.len(), 1);
    assert_eq!(buckets.blocked[0].assignee, "Unassigned");

    assert_eq!(buckets.all.len(), 3);

    let components = vec!["Rosa".to_string()];
    let client = CannedClient {
        narrative: "**Started**\nOCM-200 kicked off failover work.",
    };
    let report = report::compose_report(&buckets, 7, "OCM", &components, &client);
    assert_eq!(report, "**Started**\nOCM-200 kicked off failover work.");
}

#[test]
fn empty_tracker_response_skips_generation() {
    let response: SearchResponse = serde_json::from_str(r#"{"issues": []}"#).unwrap();
    let buckets = transitions::classify_at(&response.issues, cutoff());

    struct PanickingClient;
    impl GenerationClient for PanickingClient {
        fn complete(&self, _prompt: &str) -> Result<String> {
            panic!("backend must not be called for an empty window");
        }
    }

    let report = report::compose_report(&buckets, 7, "OCM", &[], &PanickingClient);
    assert_eq!(report, NO_DATA_MESSAGE);
}
