//! Outbound delivery services.

pub mod email;
pub mod notify;
pub mod sms;

pub use email::EmailService;
pub use sms::SmsService;
