//! Email delivery with pluggable providers.
//!
//! The provider is chosen once at startup by credential presence:
//! `RESEND_API_KEY` selects the Resend HTTP API, otherwise complete SMTP
//! settings select an SMTP relay via lettre, otherwise delivery runs in
//! simulation mode and only logs. Simulation means the "real" delivery
//! path has no effect until the deployment provides credentials - callers
//! still get `Ok` and the triggering state change stands either way.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::NotifyConfig;

/// Resend API endpoint.
const RESEND_URL: &str = "https://api.resend.com/emails";

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("Provider error: {status} - {message}")]
    Api {
        /// HTTP status from the provider.
        status: u16,
        /// Provider response body.
        message: String,
    },
}

enum Provider {
    Resend { client: reqwest::Client },
    Smtp { mailer: AsyncSmtpTransport<Tokio1Executor> },
    Simulated,
}

/// Email service for transactional notifications.
#[derive(Clone)]
pub struct EmailService {
    provider: std::sync::Arc<Provider>,
    from_address: String,
}

impl EmailService {
    /// Create an email service, selecting the provider from the
    /// configured credentials.
    ///
    /// Provider construction never fails: a misconfigured provider falls
    /// back to simulation with a logged warning, matching the rule that no
    /// delivery problem is fatal.
    #[must_use]
    pub fn from_config(config: &NotifyConfig) -> Self {
        let provider = if let Some(api_key) = &config.resend_api_key {
            match build_resend_client(api_key.expose_secret()) {
                Ok(client) => {
                    tracing::info!("Email provider: Resend");
                    Provider::Resend { client }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build Resend client, simulating email");
                    Provider::Simulated
                }
            }
        } else if let Some(smtp) = &config.smtp {
            match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host) {
                Ok(builder) => {
                    tracing::info!(host = %smtp.host, "Email provider: SMTP");
                    let mailer = builder
                        .port(smtp.port)
                        .credentials(Credentials::new(
                            smtp.username.clone(),
                            smtp.password.expose_secret().to_string(),
                        ))
                        .build();
                    Provider::Smtp { mailer }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build SMTP transport, simulating email");
                    Provider::Simulated
                }
            }
        } else {
            tracing::info!("Email provider: simulation (no credentials configured)");
            Provider::Simulated
        };

        Self {
            provider: std::sync::Arc::new(provider),
            from_address: config.from_address.clone(),
        }
    }

    /// A simulation-only service for tests.
    #[must_use]
    pub fn simulated(from_address: &str) -> Self {
        Self {
            provider: std::sync::Arc::new(Provider::Simulated),
            from_address: from_address.to_owned(),
        }
    }

    /// Name of the active provider, for the health/diagnostic surface.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match &*self.provider {
            Provider::Resend { .. } => "resend",
            Provider::Smtp { .. } => "smtp",
            Provider::Simulated => "simulated",
        }
    }

    /// Send a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the active provider rejects the message.
    /// The simulated provider never fails.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        match &*self.provider {
            Provider::Resend { client } => {
                let payload = serde_json::json!({
                    "from": self.from_address,
                    "to": [to],
                    "subject": subject,
                    "text": body,
                });

                let response = client.post(RESEND_URL).json(&payload).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(EmailError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }

                tracing::info!(to = %to, subject = %subject, "Email sent via Resend");
                Ok(())
            }
            Provider::Smtp { mailer } => {
                let email = Message::builder()
                    .from(
                        self.from_address
                            .parse()
                            .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
                    )
                    .to(to
                        .parse()
                        .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
                    .subject(subject)
                    .header(ContentType::TEXT_PLAIN)
                    .body(body.to_string())?;

                mailer.send(email).await?;
                tracing::info!(to = %to, subject = %subject, "Email sent via SMTP");
                Ok(())
            }
            Provider::Simulated => {
                tracing::info!(
                    to = %to,
                    subject = %subject,
                    body = %body,
                    "Email simulated (no provider configured)"
                );
                Ok(())
            }
        }
    }
}

fn build_resend_client(api_key: &str) -> Result<reqwest::Client, EmailError> {
    let mut headers = HeaderMap::new();
    let auth_value = format!("Bearer {api_key}");
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&auth_value)
            .map_err(|_| EmailError::InvalidAddress("invalid API key format".to_string()))?,
    );

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_send_always_succeeds() {
        let service = EmailService::simulated("noreply@capsulehaus.ru");
        assert_eq!(service.provider_name(), "simulated");
        service
            .send("ivan@example.com", "Order 0001", "Thank you")
            .await
            .unwrap();
    }

    #[test]
    fn test_provider_selection_defaults_to_simulation() {
        let config = NotifyConfig {
            admin_email: "owner@capsulehaus.ru".to_string(),
            admin_phone: None,
            from_address: "noreply@capsulehaus.ru".to_string(),
            resend_api_key: None,
            smtp: None,
        };
        let service = EmailService::from_config(&config);
        assert_eq!(service.provider_name(), "simulated");
    }

    #[test]
    fn test_provider_selection_prefers_resend() {
        let config = NotifyConfig {
            admin_email: "owner@capsulehaus.ru".to_string(),
            admin_phone: None,
            from_address: "noreply@capsulehaus.ru".to_string(),
            resend_api_key: Some(secrecy::SecretString::from("re_test_key_123")),
            smtp: None,
        };
        let service = EmailService::from_config(&config);
        assert_eq!(service.provider_name(), "resend");
    }
}
