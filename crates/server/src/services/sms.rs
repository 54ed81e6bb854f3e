//! SMS delivery stub.
//!
//! There is no SMS provider integration: every send is simulated and
//! logged. The service keeps the same call shape as the email service so
//! a provider can slot in later without touching call sites.

/// SMS service. Always simulated.
#[derive(Clone)]
pub struct SmsService {
    admin_phone: Option<String>,
}

impl SmsService {
    /// Create the SMS service with an optional admin alert number.
    #[must_use]
    pub const fn new(admin_phone: Option<String>) -> Self {
        Self { admin_phone }
    }

    /// The configured admin alert number, if any.
    #[must_use]
    pub fn admin_phone(&self) -> Option<&str> {
        self.admin_phone.as_deref()
    }

    /// "Send" an SMS: logs the payload and reports success.
    pub fn send(&self, to: &str, text: &str) {
        tracing::info!(to = %to, text = %text, "SMS simulated (no provider integration)");
    }

    /// Send to the admin alert number, if one is configured.
    pub fn send_to_admin(&self, text: &str) {
        match &self.admin_phone {
            Some(phone) => self.send(phone, text),
            None => {
                tracing::debug!("No admin phone configured, skipping SMS alert");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_never_fails() {
        let sms = SmsService::new(Some("+79991234567".to_string()));
        sms.send("+79990000000", "Order 0001 received");
        sms.send_to_admin("New order 0001");

        let without_admin = SmsService::new(None);
        without_admin.send_to_admin("dropped silently");
        assert!(without_admin.admin_phone().is_none());
    }
}
