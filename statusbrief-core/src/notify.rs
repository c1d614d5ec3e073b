//! Email delivery for the generated report.
//!
//! Delivery walks an ordered list of SMTP connection profiles and stops at
//! the first success. Missing email configuration skips the step entirely;
//! every profile failing is reported as a boolean, never a process failure.

use chrono::Local;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};

use crate::config::EmailConfig;
use crate::error::{Error, Result};

/// Last-resort relay appended to every fallback list
const GMAIL_FALLBACK_HOST: &str = "smtp.gmail.com";

/// One SMTP connection profile in the ordered fallback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProfile {
    pub host: String,
    pub port: u16,
    pub starttls: bool,
    pub auth: bool,
}

/// The ordered fallback list for a configured server.
///
/// Plain relay first, then STARTTLS without and with authentication on the
/// configured host, then the Gmail relay as a last resort. First success
/// wins; the list is static, not a backoff policy.
pub fn fallback_profiles(config: &EmailConfig) -> Vec<SmtpProfile> {
    vec![
        SmtpProfile {
            host: config.smtp_server.clone(),
            port: 25,
            starttls: false,
            auth: false,
        },
        SmtpProfile {
            host: config.smtp_server.clone(),
            port: config.smtp_port,
            starttls: true,
            auth: false,
        },
        SmtpProfile {
            host: config.smtp_server.clone(),
            port: config.smtp_port,
            starttls: true,
            auth: true,
        },
        SmtpProfile {
            host: GMAIL_FALLBACK_HOST.to_string(),
            port: 587,
            starttls: true,
            auth: true,
        },
    ]
}

/// Send the report, trying each fallback profile in order.
///
/// Returns `Ok(false)` when email is unconfigured or every profile fails,
/// `Ok(true)` on delivery. `Err` only covers message construction problems
/// such as malformed addresses.
pub fn send_report(
    email: Option<&EmailConfig>,
    report: &str,
    issue_count: usize,
    window_days: i64,
    project: &str,
    components: &[String],
) -> Result<bool> {
    let Some(email) = email else {
        println!("Email environment variables not set. Skipping email send.");
        tracing::info!("email delivery skipped, not configured");
        return Ok(false);
    };

    println!("Attempting to send email to: {}", email.recipient);

    let subject = format!(
        "Weekly Status Report - {project} ({})",
        Local::now().format("%B %d, %Y")
    );
    let body = build_body(report, issue_count, window_days, project, components);

    let message = Message::builder()
        .from(email
            .sender
            .parse()
            .map_err(|e| Error::Delivery(format!("invalid sender address: {e}")))?)
        .to(email
            .recipient
            .parse()
            .map_err(|e| Error::Delivery(format!("invalid recipient address: {e}")))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| Error::Delivery(format!("failed to build message: {e}")))?;

    for profile in fallback_profiles(email) {
        println!(
            "Trying SMTP config: {}:{} (auth={}, tls={})",
            profile.host, profile.port, profile.auth, profile.starttls
        );

        match deliver(&message, email, &profile) {
            Ok(()) => {
                println!("Report successfully sent to {}", email.recipient);
                tracing::info!(
                    host = %profile.host,
                    port = profile.port,
                    "report delivered"
                );
                return Ok(true);
            }
            Err(e) => {
                println!("Failed with {}: {}", profile.host, e);
                tracing::warn!(
                    host = %profile.host,
                    port = profile.port,
                    error = %e,
                    "SMTP attempt failed"
                );
            }
        }
    }

    println!("All SMTP configurations failed.");
    tracing::error!("every SMTP fallback profile failed");
    Ok(false)
}

/// One delivery attempt against a single profile
fn deliver(message: &Message, email: &EmailConfig, profile: &SmtpProfile) -> Result<()> {
    let mut builder = SmtpTransport::builder_dangerous(profile.host.as_str()).port(profile.port);

    if profile.starttls {
        let tls = TlsParameters::new(profile.host.clone())
            .map_err(|e| Error::Delivery(format!("TLS setup failed: {e}")))?;
        builder = builder.tls(Tls::Required(tls));
    }

    if profile.auth {
        builder = builder.credentials(Credentials::new(
            email.sender.clone(),
            email.password.clone(),
        ));
    }

    builder
        .build()
        .send(message)
        .map_err(|e| Error::Delivery(e.to_string()))?;

    Ok(())
}

fn build_body(
    report: &str,
    issue_count: usize,
    window_days: i64,
    project: &str,
    components: &[String],
) -> String {
    let period_end = Local::now();
    let period_start = period_end - chrono::Duration::days(window_days);

    format!(
        "Dear Team,\n\n\
         Please find the weekly status report for the {project} team below.\n\n\
         Report Summary:\n\
         - Period: Last {window_days} days ({start} to {end})\n\
         - Total Issues Analyzed: {issue_count}\n\
         - Components: {components}\n\n\
         {report}\n\n\
         Best regards,\n\
         Automated Status Reporting\n",
        start = period_start.format("%B %d, %Y"),
        end = period_end.format("%B %d, %Y"),
        components = components.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_config() -> EmailConfig {
        EmailConfig {
            sender: "bot@example.com".to_string(),
            password: "secret".to_string(),
            recipient: "boss@example.com".to_string(),
            smtp_server: "smtp.corp.example.com".to_string(),
            smtp_port: 587,
        }
    }

    #[test]
    fn test_unconfigured_email_skips_delivery() {
        let sent = send_report(None, "report body", 3, 7, "OCM", &[]).unwrap();
        assert!(!sent);
    }

    #[test]
    fn test_fallback_profile_order() {
        let profiles = fallback_profiles(&email_config());

        assert_eq!(profiles.len(), 4);
        assert_eq!(
            profiles[0],
            SmtpProfile {
                host: "smtp.corp.example.com".to_string(),
                port: 25,
                starttls: false,
                auth: false,
            }
        );
        assert_eq!(
            profiles[1],
            SmtpProfile {
                host: "smtp.corp.example.com".to_string(),
                port: 587,
                starttls: true,
                auth: false,
            }
        );
        assert_eq!(
            profiles[2],
            SmtpProfile {
                host: "smtp.corp.example.com".to_string(),
                port: 587,
                starttls: true,
                auth: true,
            }
        );
        assert_eq!(
            profiles[3],
            SmtpProfile {
                host: "smtp.gmail.com".to_string(),
                port: 587,
                starttls: true,
                auth: true,
            }
        );
    }

    #[test]
    fn test_body_template() {
        let components = vec!["Rosa".to_string(), "rosa-team".to_string()];
        let body = build_body("THE NARRATIVE", 12, 7, "OCM", &components);

        assert!(body.contains("weekly status report for the OCM team"));
        assert!(body.contains("Last 7 days"));
        assert!(body.contains("Total Issues Analyzed: 12"));
        assert!(body.contains("Components: Rosa, rosa-team"));
        assert!(body.contains("THE NARRATIVE"));
    }

    #[test]
    fn test_invalid_sender_is_delivery_error() {
        let mut config = email_config();
        config.sender = "not an address".to_string();

        let err = send_report(Some(&config), "body", 0, 7, "OCM", &[]).unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
    }
}
