//! # statusbrief-core
//!
//! Core library for statusbrief - an automated weekly issue-tracker status
//! report generator.
//!
//! This library provides:
//! - Tracker wire types and a search client
//! - Status-transition classification over a trailing window
//! - Narrative report composition against a generation backend
//! - Email delivery with an ordered SMTP fallback list
//!
//! ## Pipeline
//!
//! One run flows through four stages, strictly in order:
//! - **Fetch:** query the tracker for recently updated issues with history
//! - **Classify:** bucket in-window status transitions by destination
//! - **Compose:** turn the buckets into a narrative via the generation backend
//! - **Notify:** email the narrative, trying SMTP profiles until one works
//!
//! ## Example
//!
//! ```rust,no_run
//! use statusbrief_core::{transitions, Config};
//! use statusbrief_core::jira::JiraClient;
//!
//! let config = Config::from_env().expect("missing required configuration");
//! let client = JiraClient::new(&config.jira).expect("failed to build client");
//! let issues = client.search_recent("OCM", &["Rosa".to_string()], 7).expect("fetch failed");
//! let buckets = transitions::classify(&issues, 7);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use transitions::{IssueSummary, Transition, TransitionBuckets};

// Public modules
pub mod config;
pub mod error;
pub mod jira;
pub mod logging;
pub mod notify;
pub mod report;
pub mod transitions;
