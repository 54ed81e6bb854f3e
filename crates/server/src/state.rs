//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::email::EmailService;
use crate::services::sms::SmsService;
use crate::store::{JsonFileBackend, StoreError, Stores};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the persisted stores, configuration, and the
/// outbound delivery services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    stores: Stores,
    email: EmailService,
    sms: SmsService,
}

impl AppState {
    /// Create a new application state, opening the persisted stores from
    /// the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or a
    /// persisted payload does not deserialize.
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let backend = Arc::new(JsonFileBackend::open(&config.data_dir)?);
        let stores = Stores::open(backend)?;
        let email = EmailService::from_config(&config.notify);
        let sms = SmsService::new(config.notify.admin_phone.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                email,
                sms,
            }),
        })
    }

    /// Build a state over explicit parts. Used by tests that want a
    /// temporary backend and simulated delivery.
    #[must_use]
    pub fn from_parts(
        config: ServerConfig,
        stores: Stores,
        email: EmailService,
        sms: SmsService,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                email,
                sms,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the persisted stores.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get a reference to the email delivery service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Get a reference to the SMS delivery service.
    #[must_use]
    pub fn sms(&self) -> &SmsService {
        &self.inner.sms
    }
}
