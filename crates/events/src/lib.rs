//! Change feed and outbound notification plumbing.
//!
//! - [`EventBus`]: in-process publish/subscribe hub for [`DocumentEvent`]s,
//!   backed by `tokio::sync::broadcast`. Every successful store write is
//!   published here and drives live subscriptions.
//! - [`delivery`]: transactional email providers used by the contact form.

pub mod bus;
pub mod delivery;

pub use bus::{ChangeKind, DocumentEvent, EventBus};
pub use delivery::email::{
    ContactEmail, ContactNotifier, EmailConfig, EmailError, EmailProvider, ResendMailer, SmtpMailer,
};
