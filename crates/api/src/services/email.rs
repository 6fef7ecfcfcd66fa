//! Email service for password reset mail.
//!
//! Supported providers:
//! - `console`: Logs emails to the log output (development)
//! - `sendgrid`: Uses the SendGrid API

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send a password reset email carrying the reset link.
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        reset_url: &str,
    ) -> Result<(), EmailError> {
        let body_text = format!(
            r#"Hi,

We received a request to reset your password. Open the link below to choose a new one:

{reset_url}

If you didn't request a password reset, you can safely ignore this email. Your password will remain unchanged.

The Device Registry Team"#,
        );

        let message = EmailMessage {
            to: to_email.to_string(),
            subject: "Reset your password - Device Registry".to_string(),
            body_text,
        };

        self.send(message).await
    }

    /// Console provider - logs the email (for development).
    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            from = %self.config.from_address,
            "Email (console provider)"
        );
        info!(body_text = %message.body_text, "Email body");
        Ok(())
    }

    /// SendGrid provider - sends via the SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let body = serde_json::json!({
            "personalizations": [{
                "to": [{ "email": message.to }]
            }],
            "from": { "email": self.config.from_address },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            from_address: "test@example.com".to_string(),
            sendgrid_api_key: String::new(),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let service = EmailService::new(test_config());
        assert!(service.is_enabled());
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config());

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test Subject".to_string(),
            body_text: "Test body".to_string(),
        };

        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_disabled_silently_succeeds() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
        };

        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_password_reset_email() {
        let service = EmailService::new(test_config());

        let result = service
            .send_password_reset_email(
                "user@example.com",
                "https://app.example.com/reset-password?token=abc",
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let mut config = test_config();
        config.provider = "carrier-pigeon".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
        };

        assert!(matches!(
            service.send(message).await,
            Err(EmailError::NotConfigured)
        ));
    }
}
