//! Outbound notifications for ProgramKing.
//!
//! Currently a single concern: delivering contact-form enquiries to the
//! coaching team by email.
//!
//! - [`Enquiry`]: the submitted form and its rendered email.
//! - [`EnquiryMailer`]: delivery contract.
//! - [`delivery`]: transports: HTTP email API (reqwest) and SMTP (lettre),
//!   plus an in-memory recorder for tests.

pub mod delivery;
pub mod enquiry;

pub use delivery::http_api::HttpApiDelivery;
pub use delivery::recording::RecordingMailer;
pub use delivery::smtp::SmtpDelivery;
pub use delivery::{build_mailer, EmailConfig, EmailError, EmailTransport, EnquiryMailer};
pub use enquiry::Enquiry;
