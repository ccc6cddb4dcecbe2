//! Outbound delivery channels.
//!
//! Only transactional email is needed: contact-form submissions are
//! forwarded to the site owner through an [`email::EmailProvider`].

pub mod email;
