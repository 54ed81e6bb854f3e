//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_EMAIL` - Back-office login email
//! - `ADMIN_PASSWORD` - Back-office login password (min 8 chars, no placeholders)
//!
//! ## Optional
//! - `CAPSULEHAUS_HOST` - Bind address (default: 127.0.0.1)
//! - `CAPSULEHAUS_PORT` - Listen port (default: 3000)
//! - `CAPSULEHAUS_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `CAPSULEHAUS_DATA_DIR` - Persisted store directory (default: data)
//! - `NOTIFY_ADMIN_EMAIL` - Where order/callback notifications go (default: `ADMIN_EMAIL`)
//! - `NOTIFY_ADMIN_PHONE` - Admin SMS number for order alerts
//! - `EMAIL_FROM` - Sender address for outbound email (default: noreply@capsulehaus.ru)
//! - `RESEND_API_KEY` - Selects the Resend HTTP delivery provider
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_USERNAME` / `SMTP_PASSWORD` - Selects
//!   the SMTP delivery provider when Resend is not configured
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! When neither `RESEND_API_KEY` nor the SMTP variables are present, email
//! delivery runs in simulation mode and only logs. SMS delivery is always
//! simulated.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding the persisted JSON stores
    pub data_dir: PathBuf,
    /// Back-office credential pair
    pub admin: AdminConfig,
    /// Notification targets and delivery provider settings
    pub notify: NotifyConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// Back-office login credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminConfig {
    /// Login email
    pub email: String,
    /// Login password
    pub password: SecretString,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Notification targets and outbound delivery settings.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Admin inbox for order/callback/contact notifications
    pub admin_email: String,
    /// Admin phone for SMS alerts, when set
    pub admin_phone: Option<String>,
    /// Sender address for outbound email
    pub from_address: String,
    /// Resend API key; presence selects the Resend provider
    pub resend_api_key: Option<SecretString>,
    /// SMTP settings; presence selects the SMTP provider when Resend is absent
    pub smtp: Option<SmtpConfig>,
}

/// SMTP delivery settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,
    /// SMTP server port
    pub port: u16,
    /// SMTP authentication username
    pub username: String,
    /// SMTP authentication password
    pub password: SecretString,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the admin password fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CAPSULEHAUS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CAPSULEHAUS_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("CAPSULEHAUS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CAPSULEHAUS_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("CAPSULEHAUS_BASE_URL", "http://localhost:3000");
        let data_dir = PathBuf::from(get_env_or_default("CAPSULEHAUS_DATA_DIR", "data"));

        let admin = AdminConfig::from_env()?;
        let notify = NotifyConfig::from_env(&admin.email);
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            admin,
            notify,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let email = get_required_env("ADMIN_EMAIL")?;
        let password = get_required_env("ADMIN_PASSWORD")?;
        validate_admin_password(&password, "ADMIN_PASSWORD")?;

        Ok(Self {
            email,
            password: SecretString::from(password),
        })
    }

    /// Check a submitted credential pair against the configured one.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.expose_secret() == password
    }
}

impl NotifyConfig {
    fn from_env(admin_email: &str) -> Self {
        let smtp = match (
            get_optional_env("SMTP_HOST"),
            get_optional_env("SMTP_USERNAME"),
            get_optional_env("SMTP_PASSWORD"),
        ) {
            (Some(host), Some(username), Some(password)) => Some(SmtpConfig {
                host,
                port: get_env_or_default("SMTP_PORT", "587").parse().unwrap_or(587),
                username,
                password: SecretString::from(password),
            }),
            _ => None,
        };

        Self {
            admin_email: get_env_or_default("NOTIFY_ADMIN_EMAIL", admin_email),
            admin_phone: get_optional_env("NOTIFY_ADMIN_PHONE"),
            from_address: get_env_or_default("EMAIL_FROM", "noreply@capsulehaus.ru"),
            resend_api_key: get_optional_env("RESEND_API_KEY").map(SecretString::from),
            smtp,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the admin password is long enough and not a placeholder.
fn validate_admin_password(password: &str, var_name: &str) -> Result<(), ConfigError> {
    if password.len() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_PASSWORD_LENGTH,
                password.len()
            ),
        ));
    }

    let lower = password.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
