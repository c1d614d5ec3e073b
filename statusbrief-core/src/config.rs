//! Configuration loading and management
//!
//! All runtime configuration comes from environment variables, read exactly
//! once at startup into an explicit [`Config`] that is passed by reference to
//! every component. No component performs ambient environment lookups.
//!
//! Required variables: `JIRA_SERVER_URL`, `JIRA_BEARER_TOKEN`,
//! `GEMINI_API_KEY`. The email block (`EMAIL_USER`, `EMAIL_PASSWORD`,
//! `MANAGER_EMAIL`, optionally `SMTP_SERVER`/`SMTP_PORT`) is optional; when
//! incomplete, the email step is skipped.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    /// Tracker endpoint and credentials
    pub jira: JiraConfig,

    /// Generation backend configuration
    pub gemini: GeminiConfig,

    /// Email delivery configuration; `None` skips the notification step
    pub email: Option<EmailConfig>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Tracker (Jira REST v2) configuration
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Base URL, e.g. `https://issues.example.com`
    pub server_url: String,

    /// Static bearer token, assumed valid for the run
    pub bearer_token: String,

    /// Search result cap per query
    pub max_results: u32,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Generation backend (Gemini-shaped) configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key passed as a query parameter
    pub api_key: String,

    /// API endpoint base
    pub endpoint: String,

    /// Model name used in the generateContent path
    pub model: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Outbound email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Sender address, also the SMTP login user
    pub sender: String,

    /// SMTP login password (app password for Gmail)
    pub password: String,

    /// Report recipient
    pub recipient: String,

    /// Preferred SMTP host, first in the fallback list
    pub smtp_server: String,

    /// Preferred SMTP port for STARTTLS profiles
    pub smtp_port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAX_RESULTS: u32 = 200;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Fails with [`Error::Config`] naming the first missing required
    /// variable. This runs before any network call.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// This is the seam used by tests; `from_env` drives it with
    /// `std::env::var`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{name} is required")))
        };

        let jira = JiraConfig {
            server_url: required("JIRA_SERVER_URL")?,
            bearer_token: required("JIRA_BEARER_TOKEN")?,
            max_results: DEFAULT_MAX_RESULTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            endpoint: lookup("GEMINI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };

        let email = Self::email_from_vars(&lookup)?;

        let logging = LoggingConfig {
            level: lookup("STATUSBRIEF_LOG").unwrap_or_else(default_log_level),
        };

        Ok(Config {
            jira,
            gemini,
            email,
            logging,
        })
    }

    /// The email block is all-or-nothing: any of the three credential
    /// variables missing disables delivery rather than failing the run.
    fn email_from_vars(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<EmailConfig>> {
        let sender = lookup("EMAIL_USER");
        let password = lookup("EMAIL_PASSWORD");
        let recipient = lookup("MANAGER_EMAIL");

        let (Some(sender), Some(password), Some(recipient)) = (sender, password, recipient) else {
            return Ok(None);
        };

        let smtp_server = lookup("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string());
        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("SMTP_PORT is not a valid port: {e}")))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Some(EmailConfig {
            sender,
            password,
            recipient,
            smtp_server,
            smtp_port,
        }))
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/statusbrief/` (~/.local/state/statusbrief/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("statusbrief")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("statusbrief.log")
    }
}
